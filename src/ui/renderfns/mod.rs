pub mod footer;
pub mod header;
pub mod utils;

pub use footer::draw_footer;
pub use header::draw_header;
pub use utils::{
  display_name, format_height, format_id, format_stat_name, format_weight, generation_from_id,
  stat_color, truncate, type_color,
};
