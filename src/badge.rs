/// Colour family for a status pill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Warning,
    Danger,
    Info,
    Neutral,
}

impl BadgeTone {
    /// Map a backend status string to a tone. Unknown statuses are neutral.
    pub fn for_status(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "active" | "completed" | "paid" | "published" | "success" | "approved" => BadgeTone::Success,
            "pending" | "processing" | "draft" | "scheduled" => BadgeTone::Warning,
            "failed" | "cancelled" | "canceled" | "rejected" | "suspended" | "error" => BadgeTone::Danger,
            "refunded" | "info" | "new" => BadgeTone::Info,
            _ => BadgeTone::Neutral,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            BadgeTone::Success => "bg-green-100 text-green-800",
            BadgeTone::Warning => "bg-yellow-100 text-yellow-800",
            BadgeTone::Danger => "bg-red-100 text-red-800",
            BadgeTone::Info => "bg-blue-100 text-blue-800",
            BadgeTone::Neutral => "bg-gray-100 text-gray-800",
        }
    }
}

/// Shorthand for templates: status string straight to class list.
pub fn status_class(status: &str) -> &'static str {
    BadgeTone::for_status(status).css_class()
}
