// Integration tests for the reachability engine and CLI

mod integration {
    mod cli_test;
    mod config_test;
    mod reachability_test;
}
