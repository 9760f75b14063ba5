pub mod transaction_deny_config;
