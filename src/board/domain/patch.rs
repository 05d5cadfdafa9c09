//! Field-level task patches.
//!
//! A [`TaskPatch`] names a subset of a task's mutable fields together with
//! replacement values. Patches power three dispatch sites: recording
//! update history (previous/new pairs over the same field set), replaying
//! undo/redo, and merging concurrent edits field by field.

use super::{Priority, Task, TaskStatus};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Mutable fields of a task that patches can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskField {
    /// The task title.
    Title,
    /// The task description.
    Description,
    /// The status lane.
    Status,
    /// The priority level.
    Priority,
    /// The assignee.
    Assignee,
    /// The due date.
    DueDate,
    /// The tag set.
    Tags,
}

impl TaskField {
    /// Returns a short human-readable field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Assignee => "assignee",
            Self::DueDate => "due date",
            Self::Tags => "tags",
        }
    }
}

/// Replacement value for an optional field.
///
/// Distinguishes "leave untouched" (the field is absent from the patch)
/// from "set to a value" and "clear".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Replace the field with a value.
    Set(T),
    /// Clear the field.
    Clear,
}

impl<T> FieldUpdate<T> {
    /// Converts the update into the `Option` shape stored on the task.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Clear => None,
        }
    }

    /// Builds an update from the `Option` shape stored on the task.
    #[must_use]
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Clear, Self::Set)
    }
}

/// A partial update over a task's mutable fields.
///
/// Absent fields are left untouched when the patch is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<FieldUpdate<String>>,
    status: Option<TaskStatus>,
    priority: Option<Priority>,
    assignee: Option<FieldUpdate<String>>,
    due_date: Option<FieldUpdate<DateTime<Utc>>>,
    tags: Option<BTreeSet<String>>,
}

impl TaskPatch {
    /// Creates an empty patch touching no fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(FieldUpdate::Set(description.into()));
        self
    }

    /// Clears the description.
    #[must_use]
    pub fn clearing_description(mut self) -> Self {
        self.description = Some(FieldUpdate::Clear);
        self
    }

    /// Replaces the status lane.
    ///
    /// Status moves through a patch keep the task's current order rank;
    /// rank-aware moves go through the reorder entry point instead.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(FieldUpdate::Set(assignee.into()));
        self
    }

    /// Clears the assignee.
    #[must_use]
    pub fn clearing_assignee(mut self) -> Self {
        self.assignee = Some(FieldUpdate::Clear);
        self
    }

    /// Replaces the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(FieldUpdate::Set(due_date));
        self
    }

    /// Clears the due date.
    #[must_use]
    pub const fn clearing_due_date(mut self) -> Self {
        self.due_date = Some(FieldUpdate::Clear);
        self
    }

    /// Replaces the tag set.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Returns `true` when the patch touches no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.due_date.is_none()
            && self.tags.is_none()
    }

    /// Returns the set of fields this patch touches.
    #[must_use]
    pub fn field_set(&self) -> BTreeSet<TaskField> {
        let mut fields = BTreeSet::new();
        if self.title.is_some() {
            fields.insert(TaskField::Title);
        }
        if self.description.is_some() {
            fields.insert(TaskField::Description);
        }
        if self.status.is_some() {
            fields.insert(TaskField::Status);
        }
        if self.priority.is_some() {
            fields.insert(TaskField::Priority);
        }
        if self.assignee.is_some() {
            fields.insert(TaskField::Assignee);
        }
        if self.due_date.is_some() {
            fields.insert(TaskField::DueDate);
        }
        if self.tags.is_some() {
            fields.insert(TaskField::Tags);
        }
        fields
    }

    /// Returns `true` when this patch and `other` touch at least one
    /// common field.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.field_set().is_disjoint(&other.field_set())
    }

    /// Writes the patch's fields onto the task, leaving absent fields
    /// untouched. The `updated_at` stamp is the caller's responsibility.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.set_title(title.clone());
        }
        if let Some(description) = &self.description {
            task.set_description(description.clone().into_option());
        }
        if let Some(status) = self.status {
            task.set_status(status);
        }
        if let Some(priority) = self.priority {
            task.set_priority(priority);
        }
        if let Some(assignee) = &self.assignee {
            task.set_assignee(assignee.clone().into_option());
        }
        if let Some(due_date) = self.due_date {
            task.set_due_date(due_date.into_option());
        }
        if let Some(tags) = &self.tags {
            task.set_tags(tags.clone());
        }
    }

    /// Captures the task's current values for exactly the fields this
    /// patch touches, producing the inverse patch for undo.
    #[must_use]
    pub fn capture_from(&self, task: &Task) -> Self {
        let mut previous = Self::new();
        if self.title.is_some() {
            previous.title = Some(task.title().to_owned());
        }
        if self.description.is_some() {
            previous.description = Some(FieldUpdate::from_option(
                task.description().map(str::to_owned),
            ));
        }
        if self.status.is_some() {
            previous.status = Some(task.status());
        }
        if self.priority.is_some() {
            previous.priority = Some(task.priority());
        }
        if self.assignee.is_some() {
            previous.assignee = Some(FieldUpdate::from_option(task.assignee().map(str::to_owned)));
        }
        if self.due_date.is_some() {
            previous.due_date = Some(FieldUpdate::from_option(task.due_date()));
        }
        if self.tags.is_some() {
            previous.tags = Some(task.tags().clone());
        }
        previous
    }

    /// Layers `overriding` on top of this patch: fields present in both
    /// take the overriding value, fields present in either survive.
    #[must_use]
    pub fn merged_with(mut self, overriding: Self) -> Self {
        if overriding.title.is_some() {
            self.title = overriding.title;
        }
        if overriding.description.is_some() {
            self.description = overriding.description;
        }
        if overriding.status.is_some() {
            self.status = overriding.status;
        }
        if overriding.priority.is_some() {
            self.priority = overriding.priority;
        }
        if overriding.assignee.is_some() {
            self.assignee = overriding.assignee;
        }
        if overriding.due_date.is_some() {
            self.due_date = overriding.due_date;
        }
        if overriding.tags.is_some() {
            self.tags = overriding.tags;
        }
        self
    }
}
