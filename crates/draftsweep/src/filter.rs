//! Per-message eligibility decision.

use std::fmt;

use crate::config::{MissingIdentityPolicy, ScanSettings};
use crate::error::ConfigError;
use crate::identity::MessageIdentity;
use crate::ledger::ProcessedLedger;
use crate::matcher::PatternSet;
use crate::transport::MailItem;

/// Why a message was passed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rejection {
    NotMail,
    UnstableIdentity,
    AlreadyProcessed,
    AlreadyReplied,
    ReplySubject,
    NoPatternMatch,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::NotMail => "not_mail",
            Rejection::UnstableIdentity => "unstable_identity",
            Rejection::AlreadyProcessed => "already_processed",
            Rejection::AlreadyReplied => "already_replied",
            Rejection::ReplySubject => "reply_subject",
            Rejection::NoPatternMatch => "no_pattern_match",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Eligible,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Verdict::Eligible)
    }
}

/// Conjunction of side-effect-free predicates deciding whether a message gets a draft.
///
/// Checks run cheapest first; the order does not change the outcome.
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    patterns: PatternSet,
    reply_verbs: Vec<i64>,
    reply_marker: String,
    missing_identity: MissingIdentityPolicy,
}

impl EligibilityFilter {
    pub fn new(
        patterns: PatternSet,
        reply_verbs: Vec<i64>,
        reply_marker: &str,
        missing_identity: MissingIdentityPolicy,
    ) -> Self {
        Self {
            patterns,
            reply_verbs,
            reply_marker: reply_marker.to_uppercase(),
            missing_identity,
        }
    }

    pub fn from_settings(settings: &ScanSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(
            PatternSet::compile(&settings.patterns)?,
            settings.reply_verbs.clone(),
            &settings.reply_marker,
            settings.missing_identity,
        ))
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn evaluate(
        &self,
        item: &MailItem,
        identity: &MessageIdentity,
        ledger: &ProcessedLedger,
    ) -> Verdict {
        if !item.is_mail() {
            return Verdict::Rejected(Rejection::NotMail);
        }
        if identity.synthetic && self.missing_identity == MissingIdentityPolicy::Skip {
            return Verdict::Rejected(Rejection::UnstableIdentity);
        }
        if ledger.has(identity) {
            return Verdict::Rejected(Rejection::AlreadyProcessed);
        }
        if self.already_replied(item) {
            return Verdict::Rejected(Rejection::AlreadyReplied);
        }
        if self.subject_is_reply(item) {
            return Verdict::Rejected(Rejection::ReplySubject);
        }
        if !self.patterns.matches(item.body.as_deref()) {
            return Verdict::Rejected(Rejection::NoPatternMatch);
        }
        Verdict::Eligible
    }

    pub fn is_eligible(
        &self,
        item: &MailItem,
        identity: &MessageIdentity,
        ledger: &ProcessedLedger,
    ) -> bool {
        self.evaluate(item, identity, ledger).is_eligible()
    }

    /// Unknown reply state counts as "not replied".
    pub fn already_replied(&self, item: &MailItem) -> bool {
        let verb_is_reply = item
            .last_verb
            .is_some_and(|verb| self.reply_verbs.contains(&verb));
        verb_is_reply || item.replied == Some(true)
    }

    pub fn subject_is_reply(&self, item: &MailItem) -> bool {
        item.subject
            .as_deref()
            .is_some_and(|subject| subject.to_uppercase().contains(&self.reply_marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{VERB_REPLY, VERB_REPLY_ALL};
    use crate::identity::resolve;
    use crate::transport::ItemKind;

    const MATCHING_BODY: &str = "Additional rework is not expected to improve outcomes.";

    fn filter(policy: MissingIdentityPolicy) -> EligibilityFilter {
        let mut settings = ScanSettings::default();
        settings.missing_identity = policy;
        EligibilityFilter::from_settings(&settings).unwrap()
    }

    fn default_filter() -> EligibilityFilter {
        filter(MissingIdentityPolicy::Skip)
    }

    fn candidate() -> MailItem {
        MailItem::mail(1)
            .with_entry_id("e1")
            .with_store_id("s1")
            .with_subject("Status update")
            .with_body(MATCHING_BODY)
    }

    fn check(filter: &EligibilityFilter, item: &MailItem, ledger: &ProcessedLedger) -> Verdict {
        filter.evaluate(item, &resolve(item), ledger)
    }

    #[test]
    fn test_matching_fresh_message_is_eligible() {
        let ledger = ProcessedLedger::new();
        assert_eq!(
            check(&default_filter(), &candidate(), &ledger),
            Verdict::Eligible
        );
    }

    #[test]
    fn test_non_mail_rejected() {
        let ledger = ProcessedLedger::new();
        let item = candidate().with_kind(ItemKind::MeetingRequest);
        assert_eq!(
            check(&default_filter(), &item, &ledger),
            Verdict::Rejected(Rejection::NotMail)
        );
    }

    #[test]
    fn test_marked_identity_rejected_even_when_body_matches() {
        let item = candidate();
        let mut ledger = ProcessedLedger::new();
        ledger.mark(&resolve(&item));

        assert_eq!(
            check(&default_filter(), &item, &ledger),
            Verdict::Rejected(Rejection::AlreadyProcessed)
        );
    }

    #[test]
    fn test_reply_verbs_rejected() {
        let ledger = ProcessedLedger::new();
        for verb in [VERB_REPLY, VERB_REPLY_ALL] {
            let item = candidate().with_last_verb(verb);
            assert_eq!(
                check(&default_filter(), &item, &ledger),
                Verdict::Rejected(Rejection::AlreadyReplied)
            );
        }
    }

    #[test]
    fn test_other_verbs_do_not_count_as_reply() {
        let ledger = ProcessedLedger::new();
        // 104 is "forward"
        let item = candidate().with_last_verb(104);
        assert!(default_filter().is_eligible(&item, &resolve(&item), &ledger));
    }

    #[test]
    fn test_replied_flag_rejected() {
        let ledger = ProcessedLedger::new();
        let item = candidate().with_replied(true);
        assert_eq!(
            check(&default_filter(), &item, &ledger),
            Verdict::Rejected(Rejection::AlreadyReplied)
        );
    }

    #[test]
    fn test_unknown_reply_state_is_not_replied() {
        let ledger = ProcessedLedger::new();
        let item = candidate();
        assert!(item.last_verb.is_none() && item.replied.is_none());
        assert!(!default_filter().already_replied(&item));
        assert!(default_filter().is_eligible(&item, &resolve(&item), &ledger));
    }

    #[test]
    fn test_reply_subject_rejected_regardless_of_body() {
        let ledger = ProcessedLedger::new();
        for subject in ["Re: rework status", "RE: Status", "Fwd: re: lot 7"] {
            let item = candidate().with_subject(subject);
            assert_eq!(
                check(&default_filter(), &item, &ledger),
                Verdict::Rejected(Rejection::ReplySubject),
                "subject {:?}",
                subject
            );
        }
    }

    #[test]
    fn test_missing_subject_is_not_reply() {
        let mut item = candidate();
        item.subject = None;
        assert!(!default_filter().subject_is_reply(&item));
    }

    #[test]
    fn test_body_without_match_rejected() {
        let ledger = ProcessedLedger::new();
        let item = candidate().with_body("Rework completed, lot released.");
        assert_eq!(
            check(&default_filter(), &item, &ledger),
            Verdict::Rejected(Rejection::NoPatternMatch)
        );

        let mut empty = candidate();
        empty.body = None;
        assert!(!default_filter().is_eligible(&empty, &resolve(&empty), &ledger));
    }

    #[test]
    fn test_uppercase_body_matches() {
        let ledger = ProcessedLedger::new();
        let item = candidate().with_body("NOT EXPECTED TO IMPROVE WITH REWORK");
        assert!(default_filter().is_eligible(&item, &resolve(&item), &ledger));
    }

    #[test]
    fn test_synthetic_identity_policy() {
        let ledger = ProcessedLedger::new();
        let mut item = candidate();
        item.entry_id = None;

        assert_eq!(
            check(&filter(MissingIdentityPolicy::Skip), &item, &ledger),
            Verdict::Rejected(Rejection::UnstableIdentity)
        );
        assert_eq!(
            check(&filter(MissingIdentityPolicy::Synthesize), &item, &ledger),
            Verdict::Eligible
        );
    }

    #[test]
    fn test_custom_reply_marker_is_case_insensitive() {
        let ledger = ProcessedLedger::new();
        let filter = EligibilityFilter::new(
            PatternSet::compile(["rework"]).unwrap(),
            vec![],
            "aw:",
            MissingIdentityPolicy::Skip,
        );
        let item = candidate().with_subject("AW: Nacharbeit");
        assert_eq!(
            check(&filter, &item, &ledger),
            Verdict::Rejected(Rejection::ReplySubject)
        );
    }
}
