// ABOUTME: User accounts and their role-specific data, plus private messaging.
// ABOUTME: Course back-references are held as cid strings, never as live aliases.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::validate;

/// The role tag persisted with every user row. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Instructor,
    Student,
}

impl Role {
    /// The tag string stored in the users table.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Instructor => "Instructor",
            Role::Student => "Student",
        }
    }

    /// Parse a stored role tag. Returns None for anything unrecognized;
    /// the store treats that as a schema-consistency failure.
    pub fn from_tag(tag: &str) -> Option<Role> {
        match tag {
            "Admin" => Some(Role::Admin),
            "Instructor" => Some(Role::Instructor),
            "Student" => Some(Role::Student),
            _ => None,
        }
    }
}

/// A message delivered into exactly one recipient's inbox. The sender is
/// recorded by username only, not as a reference to a live user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateMessage {
    pub sender: String,
    pub subject: String,
    pub body: String,
    pub timestamp: String,
    pub is_read: bool,
}

impl PrivateMessage {
    /// Create an unread message stamped with the current local time.
    pub fn new(sender: &str, subject: &str, body: &str) -> Self {
        Self {
            sender: sender.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M").to_string(),
            is_read: false,
        }
    }

    /// Rehydrate a message with its original timestamp and read flag.
    pub fn from_stored(
        sender: String,
        subject: String,
        body: String,
        timestamp: String,
        is_read: bool,
    ) -> Self {
        Self {
            sender,
            subject,
            body,
            timestamp,
            is_read,
        }
    }
}

/// Role-specific state. Instructors and students each carry an ordered list
/// of course cids; the courses themselves live in the caller's collections
/// and are resolved through a cid lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleData {
    Admin,
    Instructor { assigned_courses: Vec<String> },
    Student { enrolled_courses: Vec<String> },
}

impl RoleData {
    fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => RoleData::Admin,
            Role::Instructor => RoleData::Instructor {
                assigned_courses: Vec::new(),
            },
            Role::Student => RoleData::Student {
                enrolled_courses: Vec::new(),
            },
        }
    }
}

/// A user account. The username is the immutable natural key; the password
/// is stored verbatim and kept private to this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    username: String,
    password: String,
    email: String,
    role: RoleData,
    pub notifications: Vec<String>,
    pub inbox: Vec<PrivateMessage>,
}

impl User {
    /// Create a user with the given role tag. The role never changes after
    /// construction.
    pub fn new(username: String, password: String, email: String, role: Role) -> Self {
        Self {
            username,
            password,
            email,
            role: RoleData::for_role(role),
            notifications: Vec::new(),
            inbox: Vec::new(),
        }
    }

    pub fn admin(username: &str, password: &str, email: &str) -> Self {
        Self::new(
            username.to_string(),
            password.to_string(),
            email.to_string(),
            Role::Admin,
        )
    }

    pub fn instructor(username: &str, password: &str, email: &str) -> Self {
        Self::new(
            username.to_string(),
            password.to_string(),
            email.to_string(),
            Role::Instructor,
        )
    }

    pub fn student(username: &str, password: &str, email: &str) -> Self {
        Self::new(
            username.to_string(),
            password.to_string(),
            email.to_string(),
            Role::Student,
        )
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        match self.role {
            RoleData::Admin => Role::Admin,
            RoleData::Instructor { .. } => Role::Instructor,
            RoleData::Student { .. } => Role::Student,
        }
    }

    /// Verbatim password comparison.
    pub fn check_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Update the email if it passes validation. Returns false on rejection
    /// without changing anything.
    pub fn update_email(&mut self, new_email: &str) -> bool {
        if validate::is_valid_email(new_email) {
            self.email = new_email.to_string();
            return true;
        }
        false
    }

    /// Update the password. Requires the current password to match and the
    /// new one to meet the minimum length.
    pub fn update_password(&mut self, current: &str, new: &str) -> bool {
        if self.check_password(current) && validate::is_valid_password(new) {
            self.password = new.to_string();
            return true;
        }
        false
    }

    /// Append a notification prefixed with the current local time.
    pub fn add_notification(&mut self, message: &str) {
        self.notifications
            .push(format!("[{}] {}", Local::now().format("%H:%M"), message));
    }

    /// Count of inbox messages not yet marked read.
    pub fn unread_count(&self) -> usize {
        self.inbox.iter().filter(|m| !m.is_read).count()
    }

    /// Cids of courses this instructor teaches. Empty for other roles.
    pub fn assigned_courses(&self) -> &[String] {
        match &self.role {
            RoleData::Instructor { assigned_courses } => assigned_courses,
            _ => &[],
        }
    }

    /// Cids of courses this student is enrolled in. Empty for other roles.
    pub fn enrolled_courses(&self) -> &[String] {
        match &self.role {
            RoleData::Student { enrolled_courses } => enrolled_courses,
            _ => &[],
        }
    }

    /// Record a course back-reference on an instructor. No-op for other
    /// roles.
    pub fn record_assigned_course(&mut self, cid: &str) {
        if let RoleData::Instructor { assigned_courses } = &mut self.role {
            assigned_courses.push(cid.to_string());
        }
    }

    /// Record a course back-reference on a student. No-op for other roles.
    pub fn record_enrolled_course(&mut self, cid: &str) {
        if let RoleData::Student { enrolled_courses } = &mut self.role {
            enrolled_courses.push(cid.to_string());
        }
    }

    /// Persistence-only accessor for the stored password. The public API for
    /// password handling is check_password/update_password.
    pub fn export_password(&self) -> &str {
        &self.password
    }
}

/// Deliver a message from `sender` into the recipient's inbox and append a
/// notification. Cross-entity mutation with no rollback; the caller is
/// responsible for having resolved the recipient.
pub fn send_message(sender: &str, recipient: &mut User, subject: &str, body: &str) {
    recipient
        .inbox
        .push(PrivateMessage::new(sender, subject, body));
    recipient.add_notification(&format!("New message from {sender}"));
}
