//! Worker binary serving `hello_world_params` over the stdin/stdout protocol
use custom_code_sdk::method_loop;

method_loop!(hello_world_params::HELLO_WORLD_PARAMS);
