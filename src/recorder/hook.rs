use super::change_recorder::ChangeRecorder;
use super::global;
use super::record::StateValue;
use serde::Serialize;
use std::sync::Arc;

/// A piece of state that reports each transition to a [`ChangeRecorder`].
///
/// Construction reports `Unset -> initial`; every effective `set` reports
/// `previous -> next`. Setting an equal value reports nothing.
pub struct DebuggableState<T> {
    value: T,
    recorder: Option<Arc<ChangeRecorder>>,
}

impl<T> DebuggableState<T>
where
    T: Serialize + PartialEq,
{
    /// Report to the global recorder when debug mode is on.
    pub async fn new(initial: T) -> Self {
        Self::init(initial, global::active_recorder()).await
    }

    pub async fn with_recorder(initial: T, recorder: Arc<ChangeRecorder>) -> Self {
        Self::init(initial, Some(recorder)).await
    }

    async fn init(value: T, recorder: Option<Arc<ChangeRecorder>>) -> Self {
        if let Some(recorder) = &recorder {
            recorder
                .capture(StateValue::Unset, StateValue::of(&value))
                .await;
        }
        Self { value, recorder }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub async fn set(&mut self, next: T) {
        if next == self.value {
            return;
        }

        let previous = std::mem::replace(&mut self.value, next);
        if let Some(recorder) = &self.recorder {
            recorder
                .capture(StateValue::of(&previous), StateValue::of(&self.value))
                .await;
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> std::ops::Deref for DebuggableState<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}
