//! Message bodies for lifecycle notifications.

use minijinja::{Environment, context};

const STATUS_CHANGED: &str = "\
Dear {{ name }}, the status of your issue \"{{ title }}\" is now {{ status }}.\
{% if status == \"Resolved\" %} Please let us know if the problem persists.{% endif %}";

const TECHNICIAN_ASSIGNED: &str = "\
Hello {{ name }}, you have been assigned to issue \"{{ title }}\".";

/// Renders notification bodies from built-in templates.
#[derive(Debug)]
pub struct NotificationTemplates {
    environment: Environment<'static>,
}

impl NotificationTemplates {
    /// Loads the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns the template syntax error if a built-in template is invalid.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut environment = Environment::new();
        environment.add_template("status_changed", STATUS_CHANGED)?;
        environment.add_template("technician_assigned", TECHNICIAN_ASSIGNED)?;
        Ok(Self { environment })
    }

    /// Renders the reporter notification for a status change.
    ///
    /// # Errors
    ///
    /// Returns the render error.
    pub fn status_changed(
        &self,
        name: &str,
        title: &str,
        status: &str,
    ) -> Result<String, minijinja::Error> {
        self.environment
            .get_template("status_changed")?
            .render(context! { name, title, status })
    }

    /// Renders the technician notification for an assignment.
    ///
    /// # Errors
    ///
    /// Returns the render error.
    pub fn technician_assigned(&self, name: &str, title: &str) -> Result<String, minijinja::Error> {
        self.environment
            .get_template("technician_assigned")?
            .render(context! { name, title })
    }
}
