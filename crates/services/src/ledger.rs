use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::info;

use shapeville_core::model::{
    ActivityKind, ItemId, LedgerSnapshot, SessionId, SessionLedger, SessionSummary, Settlement,
    SettlementRecord,
};

use crate::Clock;
use crate::error::LedgerError;

/// Shared handle to the session ledger.
///
/// Cloned into every `TaskMachine`; all clones see the same score and
/// completion set.
#[derive(Debug, Clone)]
pub struct LedgerHandle {
    clock: Clock,
    inner: Arc<Mutex<SessionLedger>>,
}

impl LedgerHandle {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionLedger::new(clock.now()))),
            clock,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionLedger>, LedgerError> {
        self.inner
            .lock()
            .map_err(|e| LedgerError::Poisoned(e.to_string()))
    }

    /// Records a settlement and awards its points.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Poisoned` if another holder panicked.
    pub fn settle(
        &self,
        activity: ActivityKind,
        item: ItemId,
        settlement: Settlement,
    ) -> Result<u32, LedgerError> {
        let record = SettlementRecord::new(activity, item, settlement, self.clock.now());
        let mut ledger = self.lock()?;
        ledger.award(record.points());
        ledger.record(record);
        Ok(ledger.score())
    }

    /// Marks an activity complete. Returns `true` only the first time.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Poisoned` if another holder panicked.
    pub fn mark_complete(&self, activity: ActivityKind) -> Result<bool, LedgerError> {
        let mut ledger = self.lock()?;
        let newly = ledger.mark_complete(activity);
        if newly {
            info!(
                %activity,
                progress_percent = ledger.progress_percent(),
                "activity completed"
            );
        }
        Ok(newly)
    }

    /// # Errors
    ///
    /// Returns `LedgerError::Poisoned` if another holder panicked.
    pub fn is_complete(&self, activity: ActivityKind) -> Result<bool, LedgerError> {
        Ok(self.lock()?.is_complete(activity))
    }

    /// # Errors
    ///
    /// Returns `LedgerError::Poisoned` if another holder panicked.
    pub fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        Ok(self.lock()?.snapshot())
    }

    /// # Errors
    ///
    /// Returns `LedgerError::Poisoned` if another holder panicked.
    pub fn history(&self) -> Result<Vec<SettlementRecord>, LedgerError> {
        Ok(self.lock()?.history().to_vec())
    }

    /// # Errors
    ///
    /// Returns `LedgerError::Poisoned` if another holder panicked.
    pub fn session_id(&self) -> Result<SessionId, LedgerError> {
        Ok(self.lock()?.id())
    }

    /// Final report stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Poisoned` if another holder panicked.
    pub fn summary(&self) -> Result<SessionSummary, LedgerError> {
        let ended_at = self.clock.now();
        Ok(self.lock()?.summary(ended_at))
    }
}
