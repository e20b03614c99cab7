// Pipeline processing: flattening enrichment payloads into fixed-column rows

pub mod flatten;
