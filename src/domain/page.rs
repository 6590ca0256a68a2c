//! Pagination and ordering parameters shared by the service and the stores.

use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Column a sample listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    SampleIdentifier,
    SampleName,
    SampleType,
    CollectionDate,
    Latitude,
    Longitude,
    LocationName,
    CollectorName,
    StorageLocation,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Name as exposed in the `sort` query parameter.
    pub fn api_name(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::SampleIdentifier => "sampleIdentifier",
            SortField::SampleName => "sampleName",
            SortField::SampleType => "sampleType",
            SortField::CollectionDate => "collectionDate",
            SortField::Latitude => "latitude",
            SortField::Longitude => "longitude",
            SortField::LocationName => "locationName",
            SortField::CollectorName => "collectorName",
            SortField::StorageLocation => "storageLocation",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    /// Column name in the `samples` table.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::SampleIdentifier => "sample_identifier",
            SortField::SampleName => "sample_name",
            SortField::SampleType => "sample_type",
            SortField::CollectionDate => "collection_date",
            SortField::Latitude => "latitude",
            SortField::Longitude => "longitude",
            SortField::LocationName => "location_name",
            SortField::CollectorName => "collector_name",
            SortField::StorageLocation => "storage_location",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }

    /// Text columns, ordered by byte value on every backend.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            SortField::SampleIdentifier
                | SortField::SampleName
                | SortField::SampleType
                | SortField::LocationName
                | SortField::CollectorName
                | SortField::StorageLocation
        )
    }

    const ALL: [SortField; 12] = [
        SortField::Id,
        SortField::SampleIdentifier,
        SortField::SampleName,
        SortField::SampleType,
        SortField::CollectionDate,
        SortField::Latitude,
        SortField::Longitude,
        SortField::LocationName,
        SortField::CollectorName,
        SortField::StorageLocation,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Sort {
            field: SortField::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl FromStr for Sort {
    type Err = String;

    /// Parses `field` or `field,asc|desc` (direction is case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);
        let field_name = parts.next().unwrap_or_default();
        let field = SortField::ALL
            .into_iter()
            .find(|f| f.api_name() == field_name)
            .ok_or_else(|| format!("cannot sort by unknown field '{}'", field_name))?;

        let direction = match parts.next() {
            None | Some("") => SortDirection::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(d) => return Err(format!("invalid sort direction '{}'", d)),
        };
        if parts.next().is_some() {
            return Err(format!("invalid sort expression '{}'", s));
        }

        Ok(Sort { field, direction })
    }
}

/// A zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }
}

impl PageRequest {
    /// Builds a request, normalising the size: 0 falls back to the default and
    /// anything above the cap is clamped.
    pub fn new(page: u32, size: u32, sort: Sort) -> Self {
        let size = match size {
            0 => DEFAULT_PAGE_SIZE,
            s => s.min(MAX_PAGE_SIZE),
        };
        PageRequest { page, size, sort }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// One page of results plus the size of the whole result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.request.size.max(1)))
    }

    pub fn is_first(&self) -> bool {
        self.request.page == 0
    }

    pub fn is_last(&self) -> bool {
        u64::from(self.request.page) + 1 >= self.total_pages()
    }
}
