use std::{collections::BTreeSet, future::Future, pin::Pin, sync::Arc};

use chrono::{Datelike, Duration, NaiveDate};
use sqlx::{PgPool, Row};

type SourceLoader = Arc<
    dyn Fn(
            NaiveDate,
            NaiveDate,
        ) -> Pin<Box<dyn Future<Output = sqlx::Result<HolidaySources>> + Send + 'static>>
        + Send
        + Sync,
>;

/// Non-working day calendar: public holidays plus active weekly offs.
///
/// Windows are half-open, `[window_start, window_end)`.
#[derive(Clone)]
pub struct HolidayService {
    load_sources: SourceLoader,
}

impl HolidayService {
    pub fn new(pool: PgPool) -> Self {
        let load_sources = move |window_start: NaiveDate, window_end: NaiveDate| {
            let pool = pool.clone();
            Box::pin(async move { load_sources_from_db(&pool, window_start, window_end).await })
                as Pin<Box<dyn Future<Output = sqlx::Result<HolidaySources>> + Send + 'static>>
        };

        Self {
            load_sources: Arc::new(load_sources),
        }
    }

    #[cfg(test)]
    fn with_loader<F, Fut>(loader: F) -> Self
    where
        F: Fn(NaiveDate, NaiveDate) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = sqlx::Result<HolidaySources>> + Send + 'static,
    {
        Self {
            load_sources: Arc::new(move |window_start, window_end| {
                Box::pin(loader(window_start, window_end))
                    as Pin<Box<dyn Future<Output = sqlx::Result<HolidaySources>> + Send + 'static>>
            }),
        }
    }

    /// Every holiday or weekly off between `start` and `end`, both inclusive.
    pub async fn non_working_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> sqlx::Result<BTreeSet<NaiveDate>> {
        if end < start {
            return Ok(BTreeSet::new());
        }
        let window_end = end
            .succ_opt()
            .ok_or_else(|| sqlx::Error::Protocol("date overflow".into()))?;
        let sources = (self.load_sources)(start, window_end).await?;

        Ok(sources
            .public_holidays
            .iter()
            .chain(sources.weekly_offs.iter())
            .copied()
            .filter(|date| *date >= start && *date <= end)
            .collect())
    }

    pub async fn list_month(
        &self,
        year: i32,
        month: u32,
    ) -> sqlx::Result<Vec<HolidayCalendarEntry>> {
        let (window_start, window_end) = month_bounds(year, month)?;
        let sources = (self.load_sources)(window_start, window_end).await?;

        let mut cursor = window_start;
        let mut entries = Vec::new();
        while cursor < window_end {
            if let Some(reason) = sources.reason_for(cursor) {
                entries.push(HolidayCalendarEntry {
                    date: cursor,
                    reason,
                });
            }
            cursor = cursor
                .succ_opt()
                .ok_or_else(|| sqlx::Error::Protocol("date overflow".into()))?;
        }

        Ok(entries)
    }
}

async fn load_sources_from_db(
    pool: &PgPool,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> sqlx::Result<HolidaySources> {
    ensure_valid_window(window_start, window_end)?;

    let mut sources = HolidaySources::default();
    let last_inclusive = window_end
        .pred_opt()
        .ok_or_else(|| sqlx::Error::Protocol("invalid calendar window".into()))?;

    let public_rows = sqlx::query(
        r#"
        SELECT holiday_date
        FROM holidays
        WHERE holiday_date >= $1
          AND holiday_date <= $2
        ORDER BY holiday_date
        "#,
    )
    .bind(window_start)
    .bind(last_inclusive)
    .fetch_all(pool)
    .await?;

    for row in public_rows {
        let date: NaiveDate = row.try_get("holiday_date")?;
        sources.public_holidays.insert(date);
    }

    let weekly_rows = sqlx::query("SELECT weekday FROM weekly_offs WHERE is_active = TRUE")
        .fetch_all(pool)
        .await?;

    for row in weekly_rows {
        let weekday: i16 = row.try_get("weekday")?;
        sources
            .weekly_offs
            .extend(expand_weekly_dates(weekday, window_start, window_end));
    }

    Ok(sources)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayReason {
    PublicHoliday,
    WeeklyOff,
}

impl HolidayReason {
    pub fn label(&self) -> &'static str {
        match self {
            HolidayReason::PublicHoliday => "public holiday",
            HolidayReason::WeeklyOff => "weekly off",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendarEntry {
    pub date: NaiveDate,
    pub reason: HolidayReason,
}

#[derive(Default, Clone)]
struct HolidaySources {
    public_holidays: BTreeSet<NaiveDate>,
    weekly_offs: BTreeSet<NaiveDate>,
}

impl HolidaySources {
    fn reason_for(&self, date: NaiveDate) -> Option<HolidayReason> {
        if self.public_holidays.contains(&date) {
            Some(HolidayReason::PublicHoliday)
        } else if self.weekly_offs.contains(&date) {
            Some(HolidayReason::WeeklyOff)
        } else {
            None
        }
    }
}

/// Fixed calendar for tests that exercise leave finalization without a database.
#[cfg(test)]
pub struct HolidayServiceStub {
    public_holidays: Arc<BTreeSet<NaiveDate>>,
    weekly_offs: Arc<Vec<i16>>,
}

#[cfg(test)]
impl HolidayServiceStub {
    pub fn new(
        public_holidays: impl IntoIterator<Item = NaiveDate>,
        weekly_offs: impl IntoIterator<Item = i16>,
    ) -> Self {
        Self {
            public_holidays: Arc::new(public_holidays.into_iter().collect()),
            weekly_offs: Arc::new(weekly_offs.into_iter().collect()),
        }
    }

    pub fn service(&self) -> HolidayService {
        let public_holidays = Arc::clone(&self.public_holidays);
        let weekly_offs = Arc::clone(&self.weekly_offs);

        HolidayService::with_loader(move |window_start, window_end| {
            let public_holidays = Arc::clone(&public_holidays);
            let weekly_offs = Arc::clone(&weekly_offs);

            async move {
                ensure_valid_window(window_start, window_end)?;
                let mut sources = HolidaySources {
                    public_holidays: (*public_holidays).clone(),
                    weekly_offs: BTreeSet::new(),
                };
                for weekday in weekly_offs.iter() {
                    sources
                        .weekly_offs
                        .extend(expand_weekly_dates(*weekday, window_start, window_end));
                }
                Ok(sources)
            }
        })
    }
}

fn month_bounds(year: i32, month: u32) -> sqlx::Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| sqlx::Error::Protocol(format!("invalid year/month: {}/{}", year, month)))?;

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(|| {
        sqlx::Error::Protocol(format!("invalid year/month: {}/{}", next_year, next_month))
    })?;

    Ok((start, end))
}

fn ensure_valid_window(window_start: NaiveDate, window_end: NaiveDate) -> sqlx::Result<()> {
    if window_start >= window_end {
        Err(sqlx::Error::Protocol(
            "invalid calendar window: start must be before end".into(),
        ))
    } else {
        Ok(())
    }
}

/// Dates in `[window_start, window_end)` falling on `weekday` (0 = Monday).
fn expand_weekly_dates(
    weekday: i16,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<NaiveDate> {
    let mut result = Vec::new();
    if window_start >= window_end {
        return result;
    }

    let target_weekday = weekday.rem_euclid(7) as u32;
    let mut cursor = align_weekday_on_or_after(window_start, target_weekday);
    while cursor < window_end {
        result.push(cursor);
        cursor += Duration::days(7);
    }

    result
}

fn align_weekday_on_or_after(date: NaiveDate, weekday: u32) -> NaiveDate {
    let current = date.weekday().num_days_from_monday();
    let diff = (weekday + 7 - current) % 7;
    date + Duration::days(diff as i64)
}
