pub mod feedback;
pub mod loaders;
pub mod outcome;
pub mod work_package;

pub use feedback::{AttachmentFile, FeedbackSubmission, Submitter};
pub use loaders::{load_feedback_file, FeedbackFile};
pub use outcome::{
    AttachmentOutcome, CreatedWorkPackage, FeedbackResponse, OperationFailure, OperationOutcome,
    ProbeOutcome,
};
pub use work_package::{WorkPackageOverrides, WorkPackageRequest};
