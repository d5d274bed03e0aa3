/// Directive declaring a sequence length: `#length<TAB>seq_id<TAB>length`.
pub const LENGTH_DIRECTIVE: &str = "#length";

/// Marks the start of a comment line.
pub const COMMENT_PREFIX: char = '#';

/// Columns in an edge line.
pub const EDGE_FIELD_COUNT: usize = 8;

/// Header comment written at the top of every dump.
pub const EDGE_DUMP_HEADER: &str =
    "#src_id\tsrc_start\tsrc_end\tsrc_ori\tdst_id\tdst_start\tdst_end\tdst_ori";
