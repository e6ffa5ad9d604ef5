//! Professional accounts joined with the application they were approved from

use crate::services::resolver::KeyResolver;
use crate::types::{Outcome, ProAccountView, ProApplication, User, Warning};

/// Shown when neither the user nor the application carries a name
pub const UNNAMED_PROFESSIONAL: &str = "Unnamed Professional";

/// Builds [`ProAccountView`]s.
///
/// Callers pass professional users only, and applications already filtered
/// with [`ProApplication::is_converted`]. If several applications point at
/// one user, the first in input order is used.
pub struct ProAccountAggregator;

impl ProAccountAggregator {
    pub fn build(users: &[User], applications: &[ProApplication]) -> Outcome<Vec<ProAccountView>> {
        let resolver = KeyResolver::exact(applications);
        let mut warnings = Vec::new();

        let views: Vec<ProAccountView> = users
            .iter()
            .map(|user| {
                let application = resolver.resolve(&user.id).ok().map(|hit| hit.record);
                if application.is_none() {
                    warnings.push(Warning::MissingApplication {
                        user_id: user.id.clone(),
                    });
                }
                Self::project(user, application)
            })
            .collect();

        if !warnings.is_empty() {
            tracing::debug!(missing = warnings.len(), "pro accounts without an application");
        }
        Outcome::new(views, warnings)
    }

    fn project(user: &User, application: Option<&ProApplication>) -> ProAccountView {
        let display_name = user
            .full_name()
            .or_else(|| {
                application.and_then(|a| {
                    let name = format!("{} {}", a.first_name.trim(), a.last_name.trim());
                    let name = name.trim();
                    (!name.is_empty()).then(|| name.to_string())
                })
            })
            .unwrap_or_else(|| UNNAMED_PROFESSIONAL.to_string());

        match application {
            Some(app) => ProAccountView {
                user_id: user.id.clone(),
                display_name,
                email: user.email.clone().or_else(|| app.email.clone()),
                phone: user.phone.clone(),
                application_id: Some(app.application_id.clone()),
                services: app.services.clone(),
                experience: app.experience.clone(),
                reviewed_at: app.reviewed_at,
                conversion_date: app.reviewed_at.unwrap_or(user.created_at),
            },
            None => ProAccountView {
                user_id: user.id.clone(),
                display_name,
                email: user.email.clone(),
                phone: user.phone.clone(),
                application_id: None,
                services: Vec::new(),
                experience: None,
                reviewed_at: None,
                conversion_date: user.created_at,
            },
        }
    }
}
