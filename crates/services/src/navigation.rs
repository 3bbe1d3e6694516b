use shapeville_core::model::ActivityKind;

/// A destructive navigation waiting for the user's confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveRequest {
    pub activity: ActivityKind,
    pub destination: Destination,
}

/// Where the user is trying to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Home,
    Activity(ActivityKind),
}

impl LeaveRequest {
    #[must_use]
    pub fn message(&self) -> String {
        let target = match self.destination {
            Destination::Home => "return to the home page".to_string(),
            Destination::Activity(kind) => format!("switch to {}", kind.title()),
        };
        format!("Are you sure you want to {target}? Your current progress will be lost.")
    }
}

/// Modal confirmation collaborator.
///
/// Asked before abandoning a problem that is still in progress.
pub trait ConfirmNavigation {
    fn confirm(&self, request: &LeaveRequest) -> bool;
}

impl<F> ConfirmNavigation for F
where
    F: Fn(&LeaveRequest) -> bool,
{
    fn confirm(&self, request: &LeaveRequest) -> bool {
        self(request)
    }
}

/// Confirms every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmNavigation for AlwaysConfirm {
    fn confirm(&self, _request: &LeaveRequest) -> bool {
        true
    }
}
