//! Tournament code metadata: which team plays which side in every coded game.

use crate::models::{
    CodeMetadataEntry, CodeMetadataReport, DuplicateCode, InputShapeError, Match, MatchId,
    SkipReason, SkippedMatch, TeamId,
};
use crate::store::{DocumentStore, StoreError};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Field of the source document holding the match list.
pub const MATCHES_FIELD: &str = "matches";

/// The parts of a match record the resolver needs, after validation.
struct EligibleMatch<'a> {
    team1_id: TeamId,
    team2_id: TeamId,
    codes: Vec<&'a str>,
}

/// Accumulates entries across matches. Remembers which match wrote each code so overwrites
/// can be reported.
#[derive(Default)]
struct Resolver {
    report: CodeMetadataReport,
    written_by: HashMap<String, usize>,
}

impl Resolver {
    fn accept(&mut self, index: usize, eligible: EligibleMatch<'_>) {
        for (game_index, code) in eligible.codes.into_iter().enumerate() {
            let entry = CodeMetadataEntry::new(eligible.team1_id, eligible.team2_id, game_index);
            if let Some(previous) = self.written_by.insert(code.to_string(), index) {
                self.report.duplicates.push(DuplicateCode {
                    code: code.to_string(),
                    previous_match_index: previous,
                    match_index: index,
                });
            }
            self.report.metadata.insert(code.to_string(), entry);
        }
        self.report.processed += 1;
    }

    fn skip(&mut self, index: usize, match_id: Option<MatchId>, reason: SkipReason) {
        self.report.skipped.push(SkippedMatch {
            index,
            match_id,
            reason,
        });
    }

    fn finish(self) -> CodeMetadataReport {
        log::debug!(
            "Resolved {} tournament codes from {} matches ({} skipped, {} duplicate codes)",
            self.report.metadata.len(),
            self.report.processed,
            self.report.skipped.len(),
            self.report.duplicates.len()
        );
        self.report
    }
}

fn check_team_ids(
    team1_id: Option<TeamId>,
    team2_id: Option<TeamId>,
) -> Result<(TeamId, TeamId), SkipReason> {
    let team1_id = team1_id.filter(|id| *id != 0).ok_or(SkipReason::MissingTeam1Id)?;
    let team2_id = team2_id.filter(|id| *id != 0).ok_or(SkipReason::MissingTeam2Id)?;
    Ok((team1_id, team2_id))
}

fn eligible_from_match(m: &Match) -> Result<EligibleMatch<'_>, SkipReason> {
    let (team1_id, team2_id) = check_team_ids(Some(m.team1_id), Some(m.team2_id))?;
    if m.tournament_codes.is_empty() {
        return Err(SkipReason::MissingTournamentCodes);
    }
    Ok(EligibleMatch {
        team1_id,
        team2_id,
        codes: m.tournament_codes.iter().map(String::as_str).collect(),
    })
}

fn eligible_from_record(record: &Map<String, Value>) -> Result<EligibleMatch<'_>, SkipReason> {
    let (team1_id, team2_id) = check_team_ids(
        record.get("team1Id").and_then(Value::as_i64),
        record.get("team2Id").and_then(Value::as_i64),
    )?;
    let codes = match record.get("tournamentCodes") {
        Some(Value::Array(codes)) if !codes.is_empty() => codes,
        _ => return Err(SkipReason::MissingTournamentCodes),
    };
    let codes = codes
        .iter()
        .enumerate()
        .map(|(position, code)| code.as_str().ok_or(SkipReason::NonStringCode { position }))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(EligibleMatch {
        team1_id,
        team2_id,
        codes,
    })
}

fn record_match_id(record: &Map<String, Value>) -> Option<MatchId> {
    record
        .get("id")
        .and_then(Value::as_u64)
        .and_then(|id| MatchId::try_from(id).ok())
}

/// Build the code -> side mapping from typed matches.
///
/// For the game at position `k` of a match, team 1 is Blue when `k` is even and Red when odd.
/// Matches without both team ids or without codes are skipped and listed in the report.
/// A code seen again in a later match overwrites the earlier entry; each overwrite is listed
/// in `duplicates`.
pub fn resolve_code_metadata(matches: &[Match]) -> CodeMetadataReport {
    let mut resolver = Resolver::default();
    for (index, m) in matches.iter().enumerate() {
        match eligible_from_match(m) {
            Ok(eligible) => resolver.accept(index, eligible),
            Err(reason) => resolver.skip(index, Some(m.id), reason),
        }
    }
    resolver.finish()
}

/// Build the code -> side mapping from a loosely typed match list (e.g. a stored document's
/// `matches` array). Each element is validated on its own; a bad element never stops the run.
pub fn resolve_match_records(records: &[Value]) -> CodeMetadataReport {
    let mut resolver = Resolver::default();
    for (index, value) in records.iter().enumerate() {
        let Some(record) = value.as_object() else {
            resolver.skip(index, None, SkipReason::NotAnObject);
            continue;
        };
        match eligible_from_record(record) {
            Ok(eligible) => resolver.accept(index, eligible),
            Err(reason) => resolver.skip(index, record_match_id(record), reason),
        }
    }
    resolver.finish()
}

/// Resolve a fetched document (`None` if it does not exist).
///
/// The document must hold a non-empty `matches` array. Otherwise the mapping is empty and
/// `input_error` says why.
pub fn resolve_document(document: Option<&Value>) -> CodeMetadataReport {
    match matches_array(document) {
        Ok(records) => resolve_match_records(records),
        Err(error) => CodeMetadataReport::from_input_error(error),
    }
}

fn matches_array(document: Option<&Value>) -> Result<&Vec<Value>, InputShapeError> {
    let document = document.ok_or(InputShapeError::DocumentNotFound)?;
    let fields = document.as_object().ok_or(InputShapeError::NotAnObject)?;
    match fields.get(MATCHES_FIELD) {
        None | Some(Value::Null) => Err(InputShapeError::MissingMatches),
        Some(Value::Array(records)) if records.is_empty() => Err(InputShapeError::EmptyMatches),
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(InputShapeError::MatchesNotArray),
    }
}

/// Fetch `collection/id` from the store and resolve it. Only store failures are errors.
pub fn resolve_from_store<S>(
    store: &S,
    collection: &str,
    id: &str,
) -> Result<CodeMetadataReport, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let document = store.fetch(collection, id)?;
    Ok(resolve_document(document.as_ref()))
}
