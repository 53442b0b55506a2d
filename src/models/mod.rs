pub mod folder;
pub mod interval_table;
pub mod review_session;
pub mod reviewable_word;
pub mod scheduler;
pub mod study_session;
pub mod word;
pub mod word_list;
pub mod word_set;

pub use folder::{Folder, FolderSession};
pub use interval_table::IntervalTable;
pub use review_session::ReviewSession;
pub use reviewable_word::ReviewableWord;
pub use scheduler::{ReviewFilter, ReviewScheduler, ReviewStatus};
pub use study_session::StudySession;
pub use word::Word;
pub use word_set::WordSet;
