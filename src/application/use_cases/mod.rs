pub mod classify;
pub mod execute_query;
pub mod generate_sql;
pub mod pipeline;
pub mod prompts;
pub mod synthesize;
