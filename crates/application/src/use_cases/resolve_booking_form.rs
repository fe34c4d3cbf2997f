//! Resolve booking form use case

use officiant_domain::form::Form;
use tracing::{debug, warn};

use crate::cache::DefaultFormIdCache;
use crate::error::{ApplicationError, ApplicationResult};
use crate::fields::canonicalize_form;
use crate::ports::{Clock, FormRepository, FormRepositoryError};

/// Finds and loads the form used for bookings.
///
/// An explicitly requested form wins, then the configured default, then the
/// form flagged as default in the repository. Loaded forms have their choice
/// options canonicalized.
pub struct ResolveBookingForm<'a, R: ?Sized, C> {
    repository: &'a R,
    cache: &'a DefaultFormIdCache<C>,
    configured_id: Option<String>,
}

impl<'a, R, C> ResolveBookingForm<'a, R, C>
where
    R: FormRepository + ?Sized,
    C: Clock,
{
    /// Creates a new `ResolveBookingForm` use case.
    #[must_use]
    pub fn new(repository: &'a R, cache: &'a DefaultFormIdCache<C>) -> Self {
        Self {
            repository,
            cache,
            configured_id: None,
        }
    }

    /// Sets the configured default booking form id.
    #[must_use]
    pub fn with_configured_id(mut self, id: Option<String>) -> Self {
        self.configured_id = id.filter(|id| !id.trim().is_empty());
        self
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `ApplicationError::NotFound` when no booking form can be
    /// determined, or a repository error if loading fails.
    pub async fn execute(&self, requested: Option<&str>) -> ApplicationResult<Form> {
        let requested = requested.filter(|id| !id.trim().is_empty());
        let form_id = match requested {
            Some(id) => id.to_string(),
            None => self.default_form_id().await?,
        };

        let mut form = match self.repository.load_form(&form_id).await {
            Ok(form) => form,
            Err(FormRepositoryError::NotFound(id)) => {
                if requested.is_none() {
                    warn!(form_id = %id, "default booking form no longer exists");
                    self.cache.invalidate();
                }
                return Err(ApplicationError::NotFound(format!("form {id}")));
            }
            Err(e) => return Err(e.into()),
        };
        debug!(form_id = %form.id, "resolved booking form");

        canonicalize_form(&mut form);
        Ok(form)
    }

    async fn default_form_id(&self) -> ApplicationResult<String> {
        if let Some(id) = &self.configured_id {
            return Ok(id.clone());
        }
        self.cache
            .get_or_fetch(self.repository)
            .await?
            .ok_or_else(|| ApplicationError::NotFound("default booking form".to_string()))
    }
}
