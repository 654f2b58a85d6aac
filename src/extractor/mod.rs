pub mod dumper;
pub mod header_writer;
pub mod help_extractor;
pub mod renderer;
pub mod report;
pub mod scratch;

pub use dumper::{ElinksDumper, TextDumper};
pub use header_writer::{HeaderWriter, TopicSummary, WriteSummary, GENERATED_HEADER};
pub use help_extractor::{ExtractionStage, HelpExtractor, HelpText};
pub use renderer::{DocRenderer, RenderRequest, SphinxRenderer};
pub use report::GenerationReport;
pub use scratch::ScratchDir;
