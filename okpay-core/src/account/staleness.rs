use okpay_sdk::objects::AccountName;

/// Marker handed out when a validation is issued.
///
/// Carries the candidate and the issuance number; the number alone decides
/// currency, so re-entering an earlier name does not revive its old request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationTicket {
    seq: u64,
    candidate: AccountName,
}

impl ValidationTicket {
    pub fn candidate(&self) -> &AccountName {
        &self.candidate
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Admits only the result of the most recently issued validation.
///
/// Ordering is by issuance, not completion: a response for any ticket other
/// than the current one is dropped without touching state.
#[derive(Debug, Default)]
pub struct StalenessGuard {
    issued: u64,
    current: Option<u64>,
}

impl StalenessGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `candidate` as the current target, superseding every earlier
    /// ticket.
    pub fn issue(&mut self, candidate: AccountName) -> ValidationTicket {
        self.issued += 1;
        self.current = Some(self.issued);
        ValidationTicket {
            seq: self.issued,
            candidate,
        }
    }

    /// Supersede every outstanding ticket without issuing a new one.
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_current(&self, ticket: &ValidationTicket) -> bool {
        self.current == Some(ticket.seq)
    }

    pub fn current_target(&self) -> Option<u64> {
        self.current
    }

    /// Pass `result` through if `ticket` is still current.
    pub fn admit<T>(&self, ticket: &ValidationTicket, result: T) -> Option<T> {
        self.is_current(ticket).then_some(result)
    }
}
