//! Create/edit modal state shared by the CRUD screens.

use std::future::Future;

use campus_core::types::Id;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Create,
    Edit(Id),
}

/// A modal form: open in create or edit mode, submit, show the error
/// inline and stay open on failure, close on success.
#[derive(Debug, Clone, Default)]
pub struct ModalForm<F> {
    mode: Option<ModalMode>,
    pub form: F,
    error: Option<String>,
    submitting: bool,
}

impl<F: Clone + Default> ModalForm<F> {
    pub fn new() -> Self {
        Self {
            mode: None,
            form: F::default(),
            error: None,
            submitting: false,
        }
    }

    /// Open with an empty form.
    pub fn open_create(&mut self) {
        self.open(ModalMode::Create, F::default());
    }

    /// Open pre-filled for the record `id`.
    pub fn open_edit(&mut self, id: Id, form: F) {
        self.open(ModalMode::Edit(id), form);
    }

    pub fn close(&mut self) {
        self.mode = None;
        self.form = F::default();
        self.error = None;
        self.submitting = false;
    }

    pub fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    pub fn mode(&self) -> Option<ModalMode> {
        self.mode
    }

    /// Inline error from the last failed submit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Run `action` with the current form.
    ///
    /// Returns the action's value and closes the modal on success. On
    /// failure the modal stays open with the error's user message and
    /// `None` is returned. A closed modal or a submit already running does
    /// nothing.
    pub async fn submit<T, Fut>(&mut self, action: impl FnOnce(ModalMode, F) -> Fut) -> Option<T>
    where
        Fut: Future<Output = AppResult<T>>,
    {
        let mode = self.mode?;
        if self.submitting {
            return None;
        }
        self.submitting = true;
        self.error = None;

        let result = action(mode, self.form.clone()).await;
        self.submitting = false;

        match result {
            Ok(value) => {
                self.close();
                Some(value)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Modal submit failed");
                self.error = Some(e.user_message());
                None
            }
        }
    }

    fn open(&mut self, mode: ModalMode, form: F) {
        self.mode = Some(mode);
        self.form = form;
        self.error = None;
        self.submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use campus_core::error::CoreError;

    use super::*;
    use crate::error::AppError;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct NameForm {
        name: String,
    }

    #[tokio::test]
    async fn success_closes_and_returns_value() {
        let mut modal = ModalForm::<NameForm>::new();
        modal.open_create();
        modal.form.name = "Algebra".into();

        let out = modal
            .submit(|mode, form| async move {
                assert_eq!(mode, ModalMode::Create);
                Ok::<_, AppError>(form.name.len())
            })
            .await;

        assert_eq!(out, Some(7));
        assert!(!modal.is_open());
        assert_eq!(modal.form, NameForm::default());
    }

    #[tokio::test]
    async fn failure_keeps_form_and_shows_error() {
        let mut modal = ModalForm::<NameForm>::new();
        modal.open_edit(4, NameForm { name: String::new() });

        let out: Option<()> = modal
            .submit(|_, _| async { Err(CoreError::Validation("Name is required".into()).into()) })
            .await;

        assert!(out.is_none());
        assert!(modal.is_open());
        assert_eq!(modal.mode(), Some(ModalMode::Edit(4)));
        assert_eq!(modal.error(), Some("Name is required"));
    }

    #[tokio::test]
    async fn closed_modal_does_not_submit() {
        let mut modal = ModalForm::<NameForm>::new();
        let out = modal
            .submit(|_, _| async { Ok::<_, AppError>(()) })
            .await;
        assert!(out.is_none());
    }
}
