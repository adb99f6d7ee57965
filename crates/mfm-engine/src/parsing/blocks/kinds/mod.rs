pub mod block_quote;
pub mod code_fence;
pub mod empty;
pub mod heading;
pub mod list;
pub mod paragraph;
pub mod section;
pub mod table;
pub mod thematic_break;

pub use block_quote::BlockParser;
pub use code_fence::{CodeLineParser, FencedCodeParser};
pub use empty::EmptyParser;
pub use heading::{HeadingParser, HeadingTextParser};
pub use list::{ListItemParser, ListParser};
pub use paragraph::{ContentLineParser, ParagraphParser};
pub use section::{DocumentParser, SectionParser};
pub use table::{Alignment, TableCellParser, TableParser, TableRowParser};
pub use thematic_break::ThematicBreakParser;
