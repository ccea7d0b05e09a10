use crate::notifier::interface::{Notice, NoticeLevel, Notifier};
use std::error::Error;
use std::sync::Mutex;

#[derive(Default)]
pub struct NotifierFake {
    notices: Mutex<Vec<Notice>>,
}

impl NotifierFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notices().iter().filter(|n| n.level == level).count()
    }
}

impl Notifier for NotifierFake {
    fn notify(&self, notice: &Notice) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.notices
            .lock()
            .map_err(|e| e.to_string())?
            .push(notice.clone());
        Ok(())
    }
}
