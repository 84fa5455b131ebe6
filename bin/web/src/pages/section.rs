//! The clinic's record sections and their access rules.

use leptos::prelude::*;
use vetdesk_access::{AccessRequirement, Role};

use crate::components::{Authorized, ProtectedRoute};

/// A top-level area of the clinic manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Users,
    Pets,
    Appointments,
    Veterinaries,
    Permissions,
    Logs,
}

impl Section {
    /// Every section, in navigation order.
    pub const ALL: [Section; 6] = [
        Section::Users,
        Section::Pets,
        Section::Appointments,
        Section::Veterinaries,
        Section::Permissions,
        Section::Logs,
    ];

    /// Returns the prefix of the section's permission names.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Section::Users => "users",
            Section::Pets => "pets",
            Section::Appointments => "appointments",
            Section::Veterinaries => "veterinaries",
            Section::Permissions => "permissions",
            Section::Logs => "logs",
        }
    }

    /// Returns the heading shown for the section.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Section::Users => "Users",
            Section::Pets => "Pets",
            Section::Appointments => "Appointments",
            Section::Veterinaries => "Veterinaries",
            Section::Permissions => "Permissions",
            Section::Logs => "Audit logs",
        }
    }

    /// Returns the route the section is served at.
    #[must_use]
    pub fn path(self) -> String {
        format!("/{}", self.key())
    }

    /// Returns what a visitor needs to open the section.
    ///
    /// Permission administration is reserved for administrators; every
    /// other section needs its `<section>.view` permission.
    #[must_use]
    pub fn requirement(self) -> AccessRequirement {
        match self {
            Section::Permissions => AccessRequirement::new().roles([Role::Administrator]),
            section => AccessRequirement::new().permissions([format!("{}.view", section.key())]),
        }
    }

    /// Returns what a visitor needs to see the section's create button.
    ///
    /// Audit logs and permission assignments are never created by hand.
    #[must_use]
    pub fn create_requirement(self) -> Option<AccessRequirement> {
        match self {
            Section::Logs | Section::Permissions => None,
            section => Some(
                AccessRequirement::new().permissions([format!("{}.create", section.key())]),
            ),
        }
    }
}

/// A section page guarded by the section's requirement.
#[component]
pub fn SectionPage(section: Section) -> impl IntoView {
    let title = section.title();

    view! {
        <ProtectedRoute requirement=section.requirement()>
            <div class="section-page">
                <div class="section-header">
                    <h1>{title}</h1>
                    {section.create_requirement().map(|requirement| view! {
                        <Authorized requirement=requirement>
                            <button class="create-button">{format!("New {}", title.to_lowercase())}</button>
                        </Authorized>
                    })}
                </div>
                <p class="section-empty">"No records loaded."</p>
            </div>
        </ProtectedRoute>
    }
}
