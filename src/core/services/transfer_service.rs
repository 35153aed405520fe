//! Paired-leg transfers between two accounts of the same ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};
use crate::ledger::{Ledger, Transaction};

/// A transfer aggregate: exactly two ledger legs sharing one transfer id,
/// created and removed together. The origin leg carries the negative
/// magnitude, the destination leg the positive one, with identical
/// timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transfer {
    pub id: Uuid,
    pub origin_leg: Transaction,
    pub destination_leg: Transaction,
}

impl Transfer {
    pub fn amount(&self) -> Decimal {
        self.destination_leg.amount
    }
}

pub struct TransferService;

impl TransferService {
    /// Moves `amount` between two accounts by posting both legs as one unit.
    /// Accounts may go negative: funds sufficiency is deliberately not
    /// checked (personal tracking, not an authorization system).
    pub fn execute(
        ledger: &mut Ledger,
        origin: &str,
        destination: &str,
        amount: Decimal,
        description: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> EngineResult<Transfer> {
        if amount <= Decimal::ZERO {
            return Err(EngineError::Validation(
                "transfer amount must be greater than zero".into(),
            ));
        }
        let origin = origin.trim();
        let destination = destination.trim();
        if origin.is_empty() || destination.is_empty() {
            return Err(EngineError::Validation(
                "transfer accounts must not be blank".into(),
            ));
        }
        if origin == destination {
            return Err(EngineError::Validation(
                "origin and destination accounts must differ".into(),
            ));
        }

        let id = Uuid::new_v4();
        let origin_leg =
            Transaction::transfer_leg(id, -amount, origin, destination, description.clone(), timestamp);
        let destination_leg =
            Transaction::transfer_leg(id, amount, destination, origin, description, timestamp);
        ledger.add_transaction(origin_leg.clone());
        ledger.add_transaction(destination_leg.clone());
        tracing::debug!(%id, %origin, %destination, "transfer executed");
        Ok(Transfer {
            id,
            origin_leg,
            destination_leg,
        })
    }

    /// Removes both legs of the transfer as one unit.
    pub fn remove(ledger: &mut Ledger, transfer_id: Uuid) -> EngineResult<Transfer> {
        let removed = ledger.remove_transfer_legs(transfer_id);
        if removed.is_empty() {
            return Err(EngineError::NotFound(format!("transfer {transfer_id}")));
        }
        if removed.len() != 2 {
            return Err(EngineError::Consistency(format!(
                "transfer {transfer_id} had {} legs instead of 2",
                removed.len()
            )));
        }
        let mut origin = None;
        let mut destination = None;
        for leg in removed {
            if leg.amount < Decimal::ZERO {
                origin = Some(leg);
            } else {
                destination = Some(leg);
            }
        }
        match (origin, destination) {
            (Some(origin_leg), Some(destination_leg)) => Ok(Transfer {
                id: transfer_id,
                origin_leg,
                destination_leg,
            }),
            _ => Err(EngineError::Consistency(format!(
                "transfer {transfer_id} legs do not carry opposite signs"
            ))),
        }
    }
}
