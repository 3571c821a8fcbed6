//! Bug operations: the remote endpoints the board client calls
//!
//! One module per operation, mirroring the tracker's AJAX pages: status
//! update (drag-and-drop), assignee update, the detail popup fetch, and the
//! assignment-candidate listing.

mod assignees;
mod details;
mod update_assignee;
mod update_status;

pub use assignees::{AssigneeList, AssigneeOption, GetTicketAssignees};
pub use details::{GetTicketDetails, TicketDetails};
pub use update_assignee::{AssigneeUpdateOutcome, UpdateAssignee};
pub use update_status::{StatusUpdateOutcome, UpdateStatus};
