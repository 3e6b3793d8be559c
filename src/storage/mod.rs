//! Collaborators at the engine's boundary: competitor import and ranking result sinks.

mod competitors;
mod results;

pub use competitors::read_competitors_csv;
pub use results::{
    read_result_rows, CsvResultSink, MemoryResultSink, ResultRow, ResultSink, SinkError,
    TestMetadata, TestSubmission,
};
