//! Queries over a materialized environment and their printable results.

use crate::error::SimError;
use rigview_env::{CategoryBucket, Environment, FieldValue, ProxyEntity};
use serde::Serialize;
use std::collections::BTreeMap;

/// Entities read by the walkthrough query.
pub const WALKTHROUGH_BEAM: &str = "BEAM_ID_1";
pub const WALKTHROUGH_ANTENNA: &str = "ANTENNA_ID_1";

/// What to read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Beam angle, antenna beams and type, then each referenced beam's angle
    Walkthrough,

    /// Every entity of every category
    Dump,

    /// Every entity of one category
    Category(String),

    /// One entity by id
    Entity(String),

    /// Resolve a reference-list field of an entity
    Resolve { id: String, field: String },
}

impl Query {
    /// Builds a query from the optional CLI selectors.
    pub fn from_selectors(
        category: Option<String>,
        entity: Option<String>,
        resolve: Option<String>,
        dump: bool,
    ) -> Result<Self, SimError> {
        match (category, entity, resolve, dump) {
            (None, None, None, false) => Ok(Query::Walkthrough),
            (None, None, None, true) => Ok(Query::Dump),
            (Some(name), None, None, false) => Ok(Query::Category(name)),
            (None, Some(id), None, false) => Ok(Query::Entity(id)),
            (None, Some(id), Some(field), false) => Ok(Query::Resolve { id, field }),
            (None, None, Some(_), _) => Err(SimError::InvalidQuery(
                "--resolve requires --entity".to_string(),
            )),
            _ => Err(SimError::InvalidQuery(
                "use at most one of --dump, --category, --entity".to_string(),
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Query::Walkthrough => "walkthrough",
            Query::Dump => "dump",
            Query::Category(_) => "category",
            Query::Entity(_) => "entity",
            Query::Resolve { .. } => "resolve",
        }
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Query::Walkthrough | Query::Dump => write!(f, "{}", self.name()),
            Query::Category(name) => write!(f, "category {}", name),
            Query::Entity(id) => write!(f, "entity {}", id),
            Query::Resolve { id, field } => write!(f, "resolve {}.{}", id, field),
        }
    }
}

/// Current field values of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityReport {
    pub category: String,
    pub id: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl EntityReport {
    pub fn from_proxy(proxy: &ProxyEntity) -> Self {
        Self {
            category: proxy.category().to_string(),
            id: proxy.id().to_string(),
            fields: proxy.snapshot(),
        }
    }
}

/// One resolved reference: the id and the value read from its target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedBeam {
    pub id: String,
    pub angle: FieldValue,
}

/// Result of [`Query::Walkthrough`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Walkthrough {
    pub beam_angle: FieldValue,
    pub antenna_beams: FieldValue,
    pub antenna_type: FieldValue,
    pub resolved: Vec<ResolvedBeam>,
}

/// Output of any query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    Walkthrough(Walkthrough),
    Entities(Vec<EntityReport>),
}

impl QueryOutput {
    /// Human-readable lines, one per value.
    pub fn lines(&self) -> Vec<String> {
        match self {
            QueryOutput::Walkthrough(w) => {
                let mut lines = vec![
                    format!("{}.getAngle = {}", WALKTHROUGH_BEAM, w.beam_angle),
                    format!("{}.getBeams = {}", WALKTHROUGH_ANTENNA, w.antenna_beams),
                    format!("{}.getType = {}", WALKTHROUGH_ANTENNA, w.antenna_type),
                ];
                lines.extend(
                    w.resolved
                        .iter()
                        .map(|b| format!("  beams[{}].getAngle = {}", b.id, b.angle)),
                );
                lines
            }
            QueryOutput::Entities(reports) => reports
                .iter()
                .flat_map(|r| {
                    std::iter::once(format!("{}/{}", r.category, r.id)).chain(
                        r.fields
                            .iter()
                            .map(|(name, value)| format!("  {} = {}", name, value)),
                    )
                })
                .collect(),
        }
    }
}

fn bucket_reports(bucket: &CategoryBucket) -> Vec<EntityReport> {
    bucket
        .iter()
        .map(|(_, proxy)| EntityReport::from_proxy(proxy))
        .collect()
}

/// Runs the reference walkthrough.
pub fn walkthrough(env: &Environment) -> Result<Walkthrough, SimError> {
    let beams = env.category("beams")?;
    let beam_angle = beams.get(WALKTHROUGH_BEAM)?.get("getAngle")?;

    let antenna = env.entity(WALKTHROUGH_ANTENNA)?;
    let antenna_beams = antenna.get("getBeams")?;
    let antenna_type = antenna.get("getType")?;

    let resolved = env
        .resolve_field(antenna, "getBeams")?
        .iter()
        .map(|beam| -> Result<ResolvedBeam, SimError> {
            Ok(ResolvedBeam {
                id: beam.id().to_string(),
                angle: beam.get("getAngle")?,
            })
        })
        .collect::<Result<Vec<_>, SimError>>()?;

    Ok(Walkthrough {
        beam_angle,
        antenna_beams,
        antenna_type,
        resolved,
    })
}

/// Executes `query` against `env`.
pub fn run(env: &Environment, query: &Query) -> Result<QueryOutput, SimError> {
    let output = match query {
        Query::Walkthrough => QueryOutput::Walkthrough(walkthrough(env)?),
        Query::Dump => QueryOutput::Entities(env.buckets().flat_map(bucket_reports).collect()),
        Query::Category(name) => QueryOutput::Entities(bucket_reports(env.category(name)?)),
        Query::Entity(id) => {
            QueryOutput::Entities(vec![EntityReport::from_proxy(env.entity(id)?)])
        }
        Query::Resolve { id, field } => {
            let proxy = env.entity(id)?;
            let targets = env.resolve_field(proxy, field)?;
            QueryOutput::Entities(
                targets
                    .iter()
                    .map(|target| EntityReport::from_proxy(target))
                    .collect(),
            )
        }
    };
    Ok(output)
}
