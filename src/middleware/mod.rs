pub mod user_context;
