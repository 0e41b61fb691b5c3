pub mod content;
pub mod feedback;
pub mod movie;
pub mod quiz;
pub mod student;

pub use content::{Content, ContentRow, Layer, LAYER_COUNT};
pub use feedback::{FeedbackEvent, FeedbackRow, FeedbackSignal};
pub use movie::{Movie, MovieRecord, Recommendation};
pub use quiz::{QuizAttempt, QuizOption, QuizQuestion, QuizRow};
pub use student::{Credentials, Student, StudentRow};
