// mod.rs — Command modules and the shared mutating-command session.

pub mod goal;
pub mod journal;
pub mod milestone;

use gl_engine::{
    EventDispatcher, FileSubstrate, GoalEngine, LedgerError, LogSink, Principal, TxContext,
};
use gl_journal::{JournalEntry, OperationJournal};

use crate::clock::TickClock;
use crate::config::LedgerConfig;

/// Everything a mutating command needs: the engine over the project's
/// substrate (with the event log attached), the operation journal, and a
/// resolved TxContext.
///
/// Opening a session advances the tick clock once — one mutating command,
/// one block — unless an explicit `--height` pins it.
pub(crate) struct Session {
    pub engine: GoalEngine<FileSubstrate>,
    pub journal: OperationJournal,
    pub ctx: TxContext,
}

impl Session {
    pub fn open(
        config: &LedgerConfig,
        caller: Option<&str>,
        height: Option<u64>,
    ) -> anyhow::Result<Self> {
        let substrate = FileSubstrate::open(&config.ledger_file)?;
        let mut events = EventDispatcher::new();
        events.add_sink(Box::new(LogSink::new(&config.events_log)));
        let engine = GoalEngine::with_dispatcher(substrate, events);

        let journal = OperationJournal::open(&config.journal_file)?;

        let block_height = match height {
            Some(h) => h,
            None => TickClock::open(&config.height_file)?.advance()?,
        };
        let caller = Principal::new(config.resolve_caller(caller)?);
        tracing::debug!(caller = %caller, block_height, "ledger session opened");

        Ok(Self {
            engine,
            journal,
            ctx: TxContext::new(caller, block_height),
        })
    }

    /// A journal entry template for this session's operation.
    pub fn entry(&self, operation: gl_journal::OperationKind) -> JournalEntry {
        JournalEntry::new(self.ctx.caller.as_str(), operation, self.ctx.block_height)
    }

    /// Journal an operation outcome, then hand the result back. Accepted
    /// and rejected submissions both land in the journal.
    pub fn record<T>(
        &mut self,
        entry: JournalEntry,
        result: Result<T, LedgerError>,
    ) -> anyhow::Result<T> {
        match result {
            Ok(value) => {
                self.journal.append(entry)?;
                Ok(value)
            }
            Err(e) => {
                self.journal.append(entry.rejected(e.to_string()))?;
                Err(e.into())
            }
        }
    }
}

/// A read-only engine over the project's substrate. No journal, no event
/// sinks, no clock tick.
pub(crate) fn read_only_engine(
    config: &LedgerConfig,
) -> anyhow::Result<GoalEngine<FileSubstrate>> {
    Ok(GoalEngine::new(FileSubstrate::open(&config.ledger_file)?))
}
