mod kernel_list_parser;

pub use kernel_list_parser::parse_kernel_list;
