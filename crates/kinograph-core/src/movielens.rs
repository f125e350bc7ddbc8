//! MovieLens 100k dataset loader
//!
//! Reads the flat-file MovieLens distribution (tab-separated ratings in
//! `u.data`, pipe-separated movie metadata in `u.item`) and left-joins
//! ratings onto the selected item columns. Optional columns are carried as
//! `None` when not requested rather than materialized empty.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::knowledge::Item;

/// Ratings file inside the dataset directory
const RATINGS_FILE: &str = "u.data";

/// Item metadata file inside the dataset directory
const ITEMS_FILE: &str = "u.item";

/// The 19 genre flags of the 100k item schema, in column order
const GENRES: [&str; 19] = [
    "unknown",
    "Action",
    "Adventure",
    "Animation",
    "Children's",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Fantasy",
    "Film-Noir",
    "Horror",
    "Musical",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Thriller",
    "War",
    "Western",
];

/// Column count of `u.item`: id, title, release date, video release date,
/// URL, then one flag per genre.
const ITEM_COLUMNS: usize = 5 + GENRES.len();

/// Column selection and header options for [`load`]
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Names of the four rating columns, in the order they appear in the
    /// file. Must contain `UserId`, `ItemId`, `Rating` and `Timestamp`,
    /// in any order.
    pub rating_header: Vec<String>,
    /// Attach movie titles to each rating row
    pub title: bool,
    /// Attach a `|`-joined genre string to each rating row
    pub genres: bool,
    /// Attach the release year (last four characters of the release date)
    pub year: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            rating_header: ["UserId", "ItemId", "Rating", "Timestamp"]
                .map(String::from)
                .to_vec(),
            title: true,
            genres: false,
            year: false,
        }
    }
}

/// One rating event joined with the requested item metadata
#[derive(Debug, Clone)]
pub struct RatedItem {
    pub user_id: String,
    pub item_id: String,
    pub rating: f32,
    pub timestamp: i64,
    /// Present only when requested and the item metadata row exists
    pub title: Option<String>,
    /// `|`-joined genre names, present only when requested
    pub genres: Option<String>,
    /// Release year, present only when requested
    pub year: Option<String>,
}

/// Field positions of the four rating columns, derived from the header
#[derive(Debug, Clone, Copy)]
struct RatingColumns {
    user: usize,
    item: usize,
    rating: usize,
    timestamp: usize,
}

impl RatingColumns {
    fn from_header(header: &[String]) -> Result<Self> {
        if header.len() != 4 {
            return Err(Error::InvalidInput(format!(
                "rating header must name 4 columns, got {}",
                header.len()
            )));
        }
        let find = |name: &str| {
            header
                .iter()
                .position(|column| column == name)
                .ok_or_else(|| {
                    Error::InvalidInput(format!("rating header is missing the {name} column"))
                })
        };
        Ok(Self {
            user: find("UserId")?,
            item: find("ItemId")?,
            rating: find("Rating")?,
            timestamp: find("Timestamp")?,
        })
    }
}

/// Item metadata parsed from `u.item`
#[derive(Debug, Clone)]
struct ItemMeta {
    title: String,
    release_date: String,
    genres: String,
}

impl ItemMeta {
    /// Last four characters of the release date, as the dataset encodes
    /// dates like `01-Jan-1995`
    fn year(&self) -> Option<String> {
        let chars: Vec<char> = self.release_date.chars().collect();
        if chars.len() >= 4 {
            Some(chars[chars.len() - 4..].iter().collect())
        } else {
            None
        }
    }
}

/// Load ratings left-joined with the selected item columns.
///
/// Malformed rows are skipped with a warning; a missing file is fatal.
pub fn load(data_dir: &Path, options: &LoadOptions) -> Result<Vec<RatedItem>> {
    let columns = RatingColumns::from_header(&options.rating_header)?;

    let items = read_items(&data_dir.join(ITEMS_FILE))?;
    let ratings = read_ratings(&data_dir.join(RATINGS_FILE), columns)?;

    debug!(
        ratings = ratings.len(),
        items = items.len(),
        "Joining ratings with item metadata"
    );

    let joined = ratings
        .into_iter()
        .map(|mut row| {
            if let Some(meta) = items.get(&row.item_id) {
                if options.title {
                    row.title = Some(meta.title.clone());
                }
                if options.genres {
                    row.genres = Some(meta.genres.clone());
                }
                if options.year {
                    row.year = meta.year();
                }
            }
            row
        })
        .collect();

    Ok(joined)
}

/// Deduplicate rated rows into distinct pipeline items, first appearance
/// first, truncated to `sample` when given.
///
/// Rows without a title cannot be resolved by name and are dropped with a
/// warning (their ratings are still part of the joined table).
pub fn distinct_items(rows: &[RatedItem], sample: Option<usize>) -> Vec<Item> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut items = Vec::new();

    for row in rows {
        if !seen.insert(row.item_id.as_str()) {
            continue;
        }

        let Some(title) = &row.title else {
            warn!(item_id = %row.item_id, "Item has no title, skipping");
            continue;
        };

        let mut attributes = HashMap::new();
        attributes.insert("ItemId".to_string(), row.item_id.clone());
        if let Some(year) = &row.year {
            attributes.insert("Year".to_string(), year.clone());
        }

        items.push(Item {
            id: row.item_id.clone(),
            title: title.clone(),
            attributes,
        });

        if let Some(limit) = sample {
            if items.len() >= limit {
                break;
            }
        }
    }

    items
}

/// Parse the tab-separated ratings file, reading fields at the positions
/// the header names them
fn read_ratings(path: &Path, columns: RatingColumns) -> Result<Vec<RatedItem>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .map_err(|e| Error::Dataset(format!("failed to open {}: {}", path.display(), e)))?;

    let mut rows = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() < 4 {
            warn!(line, "Rating row has fewer than 4 columns, skipping");
            continue;
        }

        let rating = match record[columns.rating].parse::<f32>() {
            Ok(r) => r,
            Err(_) => {
                warn!(
                    line,
                    value = &record[columns.rating],
                    "Unparseable rating, skipping row"
                );
                continue;
            }
        };
        let timestamp = match record[columns.timestamp].parse::<i64>() {
            Ok(t) => t,
            Err(_) => {
                warn!(
                    line,
                    value = &record[columns.timestamp],
                    "Unparseable timestamp, skipping row"
                );
                continue;
            }
        };

        rows.push(RatedItem {
            user_id: record[columns.user].to_string(),
            item_id: record[columns.item].to_string(),
            rating,
            timestamp,
            title: None,
            genres: None,
            year: None,
        });
    }

    Ok(rows)
}

/// Parse the pipe-separated item metadata file.
///
/// The 100k distribution is ISO-8859-1 encoded, so rows are read as bytes
/// and decoded lossily.
fn read_items(path: &Path) -> Result<HashMap<String, ItemMeta>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::Dataset(format!("failed to open {}: {}", path.display(), e)))?;

    let mut items = HashMap::new();

    for (line, record) in reader.byte_records().enumerate() {
        let record = record?;
        if record.len() < ITEM_COLUMNS {
            warn!(
                line,
                columns = record.len(),
                "Item row has too few columns, skipping"
            );
            continue;
        }

        let field = |i: usize| String::from_utf8_lossy(&record[i]).into_owned();

        let genres = GENRES
            .iter()
            .enumerate()
            .filter(|(i, _)| record.get(5 + i) == Some(&b"1"[..]))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join("|");

        items.insert(
            field(0),
            ItemMeta {
                title: field(1),
                release_date: field(2),
                genres,
            },
        );
    }

    Ok(items)
}
