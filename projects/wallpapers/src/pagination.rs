use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 8;
pub const MAX_PAGE_SIZE: i64 = 9;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageRequestError {
    #[error("page size must be less than 10, got {ps}")]
    PageSizeTooLarge { ps: i64 },
    #[error("page number must be at least 1, got {pn}")]
    PageNumberTooSmall { pn: i64 },
    #[error("page size must be at least 1, got {ps}")]
    PageSizeTooSmall { ps: i64 },
    #[error("page {pn} is out of range")]
    PageOutOfRange { pn: i64 },
}

/// Validated `pn`/`ps` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub pn: i64,
    pub ps: i64,
    offset: i64,
}

impl PageRequest {
    pub fn new(pn: Option<i64>, ps: Option<i64>) -> Result<Self, PageRequestError> {
        let pn = pn.unwrap_or(DEFAULT_PAGE);
        let ps = ps.unwrap_or(DEFAULT_PAGE_SIZE);

        if ps > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeTooLarge { ps });
        }
        if pn < 1 {
            return Err(PageRequestError::PageNumberTooSmall { pn });
        }
        if ps < 1 {
            return Err(PageRequestError::PageSizeTooSmall { ps });
        }
        let offset = (pn - 1)
            .checked_mul(ps)
            .ok_or(PageRequestError::PageOutOfRange { pn })?;

        Ok(Self { pn, ps, offset })
    }

    pub fn limit(&self) -> i64 {
        self.ps
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

/// One page of results; `count` is the number of items on this page, not the total.
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub count: usize,
    pub pn: i64,
    pub ps: i64,
}

impl<T> Page<T> {
    pub fn new(request: PageRequest, data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
            pn: request.pn,
            ps: request.ps,
        }
    }
}
