pub mod use_cases;

pub use use_cases::classify::ClassifyQueryUseCase;
pub use use_cases::execute_query::{ExecuteQueryUseCase, QueryExecution};
pub use use_cases::generate_sql::GenerateSqlUseCase;
pub use use_cases::pipeline::{PipelineOptions, ProcessQueryUseCase};
pub use use_cases::synthesize::SynthesizeAnswerUseCase;
