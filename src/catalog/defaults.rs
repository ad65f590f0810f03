//! Built-in FamilyHub module definitions

use super::ModuleDescriptor;

/// Get the default module definitions
///
/// Returns the six household modules the portal knows about, whether or not
/// any of them is implemented on disk.
pub fn default_modules() -> Vec<ModuleDescriptor> {
    vec![
        ModuleDescriptor::new("timesheet", "Timesheet", 1)
            .with_description("Time tracking and job management")
            .with_icon("fas fa-clock")
            .with_color("primary"),
        ModuleDescriptor::new("daycare_invoice", "Daycare Invoice Tracker", 2)
            .with_description("Track and manage daycare invoices")
            .with_icon("fas fa-baby")
            .with_color("success"),
        ModuleDescriptor::new("employment_history", "Employment History", 3)
            .with_description("Manage employment records")
            .with_icon("fas fa-briefcase")
            .with_color("info"),
        ModuleDescriptor::new("upcoming_payments", "Upcoming Payments", 4)
            .with_description("Track upcoming bills and payments")
            .with_icon("fas fa-calendar-alt")
            .with_color("warning"),
        ModuleDescriptor::new("credit_card_mgmt", "Credit Card Management", 5)
            .with_description("Manage credit card accounts")
            .with_icon("fas fa-credit-card")
            .with_color("danger"),
        ModuleDescriptor::new("household_budget", "Household Budget", 6)
            .with_description("Family budget management")
            .with_icon("fas fa-calculator")
            .with_color("secondary"),
    ]
}
