mod harness;
mod read_tools_test;
