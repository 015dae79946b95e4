mod config_io_tests;
