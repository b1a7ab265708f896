//! Stitching of per-resource side tables (tags, feedback counts) onto resource
//! rows. Each side table is fetched once for the whole batch of resources and
//! indexed by resource id.

use std::collections::HashMap;

use crate::models::feedback::{FeedbackTally, FeedbackTallyRow};
use crate::models::resource::{Resource, ResourceId, ResourceSummary, ResourceWithTags};
use crate::models::tag::{ResourceTagRow, TagName};

pub fn group_tags(rows: Vec<ResourceTagRow>) -> HashMap<ResourceId, Vec<TagName>> {
    let mut grouped: HashMap<ResourceId, Vec<TagName>> = HashMap::new();
    for row in rows {
        grouped.entry(row.resource_id).or_default().push(row.into());
    }
    grouped
}

pub fn index_tallies(rows: &[FeedbackTallyRow]) -> HashMap<ResourceId, FeedbackTally> {
    rows.iter()
        .map(|row| (row.resource_id, FeedbackTally::from(row)))
        .collect()
}

/// Keeps the order of `resources`. Resources without tags or feedback get an
/// empty tag list and a zero tally.
pub fn assemble_summaries(
    resources: Vec<Resource>,
    tag_rows: Vec<ResourceTagRow>,
    tally_rows: &[FeedbackTallyRow],
) -> Vec<ResourceSummary> {
    let mut tags = group_tags(tag_rows);
    let tallies = index_tallies(tally_rows);
    resources
        .into_iter()
        .map(|resource| ResourceSummary {
            tags: tags.remove(&resource.id).unwrap_or_default(),
            tally: tallies.get(&resource.id).copied().unwrap_or_default(),
            resource,
        })
        .collect()
}

pub fn attach_tags(resources: Vec<Resource>, tag_rows: Vec<ResourceTagRow>) -> Vec<ResourceWithTags> {
    let mut tags = group_tags(tag_rows);
    resources
        .into_iter()
        .map(|resource| ResourceWithTags {
            tags: tags.remove(&resource.id).unwrap_or_default(),
            resource,
        })
        .collect()
}

pub fn resource_ids(resources: &[Resource]) -> Vec<ResourceId> {
    resources.iter().map(|resource| resource.id).collect()
}
