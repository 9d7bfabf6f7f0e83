mod tool_tests;
