pub mod icons;
pub mod output;
pub mod progress;

pub use icons::Icons;
pub use output::{error, info, section, success, summary_row, warn};
pub use progress::RefreshProgress;
