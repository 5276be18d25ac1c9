mod repl_tests;
