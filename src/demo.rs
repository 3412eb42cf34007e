//! The escrow demonstration orchestrator.
//!
//! A linear state machine: provision two identities, report balances, create
//! a time-locked escrow, wait for the ledger to pass the release time,
//! discover the escrow object's sequence, finish it, report balances again.
//! Each state is a method; `?`-propagation guarantees later states never run
//! once one fails.

use std::io::Write;
use std::time::Instant;

use crate::client::LedgerClient;
use crate::config::DemoConfig;
use crate::error::DemoError;
use crate::time::ripple_time_now;
use crate::tx::{first_escrow, Operation, TransactionResult};
use crate::wallet::{Identity, IdentityProvisioner};

/// Terminal state of a demonstration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoOutcome {
    Completed {
        create_hash: String,
        finish_hash: String,
        offer_sequence: u32,
    },
    /// No escrow object was found after the wait. A normal early exit, not
    /// an error: reruns can hit it when the object already finished.
    NoEscrowFound { create_hash: String },
}

pub struct EscrowDemo<C, P, W> {
    client: C,
    provisioner: P,
    config: DemoConfig,
    out: W,
}

impl<C, P, W> EscrowDemo<C, P, W>
where
    C: LedgerClient,
    P: IdentityProvisioner,
    W: Write,
{
    pub fn new(client: C, provisioner: P, config: DemoConfig, out: W) -> Self {
        Self {
            client,
            provisioner,
            config,
            out,
        }
    }

    /// Hand back the narration sink (used by tests to inspect output).
    pub fn into_output(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) {
        // Narration failures must not abort the demonstration.
        let _ = writeln!(self.out, "{}", text.as_ref());
    }

    /// Run the whole escrow lifecycle.
    pub async fn run(&mut self) -> Result<DemoOutcome, DemoError> {
        let (source, destination) = self.provision_identities().await?;
        self.report_balances("Initial", &source, &destination).await?;
        let (create, finish_after) = self.create_escrow(&source, &destination).await?;
        self.wait_for_maturity(finish_after).await?;
        let Some(sequence) = self.locate_escrow(&source).await? else {
            self.line("No escrow object found. Exiting.");
            return Ok(DemoOutcome::NoEscrowFound {
                create_hash: create.hash,
            });
        };
        let finish = self.finish_escrow(&source, sequence).await?;
        self.report_balances("Final", &source, &destination).await?;
        Ok(DemoOutcome::Completed {
            create_hash: create.hash,
            finish_hash: finish.hash,
            offer_sequence: sequence,
        })
    }

    /// State 1: provision the source and destination identities.
    pub async fn provision_identities(&mut self) -> Result<(Identity, Identity), DemoError> {
        let source = self.provisioner.provision("wallet 1").await?;
        let destination = self.provisioner.provision("wallet 2").await?;
        self.line(format!("Wallet 1: {}", source.address));
        self.line(format!("Wallet 2: {}", destination.address));
        Ok((source, destination))
    }

    /// States 2 and 7: report both balances. Read-only.
    pub async fn report_balances(
        &mut self,
        label: &str,
        source: &Identity,
        destination: &Identity,
    ) -> Result<(), DemoError> {
        self.line(format!("{label} balances:"));
        let source_drops = self.client.balance(&source.address).await?;
        self.line(format!("  Wallet 1: {source_drops} drops"));
        let destination_drops = self.client.balance(&destination.address).await?;
        self.line(format!("  Wallet 2: {destination_drops} drops"));
        Ok(())
    }

    /// State 3: submit EscrowCreate with release time = now + configured
    /// delay. Returns the validated result and the release time.
    pub async fn create_escrow(
        &mut self,
        source: &Identity,
        destination: &Identity,
    ) -> Result<(TransactionResult, u32), DemoError> {
        let delay = self.config.escrow_delay.as_secs();
        let finish_after = ripple_time_now() + delay as u32;
        self.line(format!("Creating escrow with {delay}s release delay..."));
        let op = Operation::escrow_create(
            &source.address,
            &destination.address,
            self.config.escrow_amount,
            finish_after,
        );
        let result = self.client.submit_and_confirm(&op, source).await?;
        self.line(format!("EscrowCreate validated! Tx hash: {}", result.hash));
        Ok((result, finish_after))
    }

    /// State 4: poll the validated ledger until its close time passes the
    /// release time plus the grace margin, bounded by the wait timeout.
    pub async fn wait_for_maturity(&mut self, finish_after: u32) -> Result<(), DemoError> {
        let target = finish_after + self.config.maturity_grace.as_secs() as u32;
        self.line("Waiting for the escrow to become finishable...");
        let started = Instant::now();
        loop {
            let ledger = self.client.latest_validated_ledger().await?;
            if ledger.close_time >= target {
                self.line(format!(
                    "Ledger {} closed past the release time.",
                    ledger.ledger_index
                ));
                return Ok(());
            }
            if started.elapsed() > self.config.wait_timeout {
                return Err(DemoError::Timeout(format!(
                    "ledger close time never reached {target}"
                )));
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// State 5: fetch the source-owned objects (the creator owns the escrow
    /// entry) and take the first escrow record's sequence, if any.
    pub async fn locate_escrow(&mut self, source: &Identity) -> Result<Option<u32>, DemoError> {
        self.line("Fetching escrow object...");
        let objects = self.client.account_objects(&source.address).await?;
        let Some(escrow) = first_escrow(&objects) else {
            return Ok(None);
        };
        let sequence = escrow.sequence.ok_or_else(|| {
            DemoError::Query("escrow object carries no creating sequence".into())
        })?;
        self.line(format!("Found escrow with sequence: {sequence}"));
        Ok(Some(sequence))
    }

    /// State 6: submit EscrowFinish with the discovered sequence.
    pub async fn finish_escrow(
        &mut self,
        source: &Identity,
        offer_sequence: u32,
    ) -> Result<TransactionResult, DemoError> {
        let op = Operation::escrow_finish(&source.address, &source.address, offer_sequence);
        let result = self.client.submit_and_confirm(&op, source).await?;
        self.line(format!("EscrowFinish validated! Tx hash: {}", result.hash));
        Ok(result)
    }

    /// Diagnostic phase: print the latest validated ledger and its first
    /// transaction, when there is one. Separate from the escrow lifecycle.
    pub async fn inspect_latest_ledger(&mut self) -> Result<(), DemoError> {
        let ledger = self.client.latest_validated_ledger().await?;
        self.line(format!("Latest ledger index: {}", ledger.ledger_index));
        let Some(first) = ledger.transactions.first() else {
            self.line("No transactions in the latest ledger.");
            return Ok(());
        };
        let tx = self.client.transaction(first).await?;
        self.line("First transaction in ledger:");
        self.line(format!("  Hash: {}", tx.hash));
        self.line(format!("  Type: {}", tx.transaction_type));
        if let Some(account) = &tx.account {
            self.line(format!("  From: {account}"));
        }
        if let Some(amount) = &tx.amount {
            self.line(format!("  Amount: {amount} drops"));
        }
        Ok(())
    }
}
