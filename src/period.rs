//! Period Module
//!
//! 期間の指定に使用する暦年（`Year`）と暦月（`CalendarMonth`）、
//! およびその二者を閉じた和型として扱う`Period`を定義するモジュール。

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::WonderError;

/// 1年あたりの月数
pub const NUM_MONTHS: u32 = 12;

/// 暦年
///
/// 年全体を表す期間です。比較では年の粒度でのみ扱われます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Year {
    year: i32,
}

impl Year {
    /// 新しい暦年を生成
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    /// 年を取得
    pub fn year(&self) -> i32 {
        self.year
    }

    /// この年に含まれる12か月を1月から順に返す
    pub fn months(&self) -> impl Iterator<Item = CalendarMonth> {
        let year = self.year;
        (1..=NUM_MONTHS).map(move |month| CalendarMonth { year, month })
    }

    /// `other`より前かどうかを判定（年の粒度）
    pub fn is_before(&self, other: impl Into<Period>) -> bool {
        Period::Year(*self).is_before(&other.into())
    }

    /// `other`より後かどうかを判定（年の粒度）
    pub fn is_after(&self, other: impl Into<Period>) -> bool {
        Period::Year(*self).is_after(&other.into())
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year)
    }
}

/// 暦月
///
/// 月（1〜12）と年の組です。
/// 派生した`Ord`はフィールド順（年→月）で比較するため、
/// `year`を`month`より先に宣言しています。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// 新しい暦月を生成
    ///
    /// # 引数
    ///
    /// * `month` - 月（1〜12）
    /// * `year` - 年
    ///
    /// # 戻り値
    ///
    /// * `Ok(CalendarMonth)` - 月が範囲内の場合
    /// * `Err(WonderError::MonthOutOfRange)` - 月が1〜12の範囲外の場合
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use wondergrid::CalendarMonth;
    ///
    /// // 1998年7月
    /// let july = CalendarMonth::new(7, 1998).unwrap();
    /// assert_eq!(july.to_string(), "1998/07");
    ///
    /// assert!(CalendarMonth::new(13, 1998).is_err());
    /// ```
    pub fn new(month: u32, year: i32) -> Result<Self, WonderError> {
        if month == 0 || month > NUM_MONTHS {
            return Err(WonderError::MonthOutOfRange(i64::from(month)));
        }
        Ok(Self { year, month })
    }

    /// 日付を含む暦月を生成
    pub fn from_date<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 月を取得（1〜12）
    pub fn month(&self) -> u32 {
        self.month
    }

    /// 年を取得
    pub fn year(&self) -> i32 {
        self.year
    }

    /// 翌月を返す
    ///
    /// 12月の場合は翌年の1月になります。年がオーバーフローする場合は`None`。
    pub fn succ(&self) -> Option<Self> {
        if self.month == NUM_MONTHS {
            Some(Self {
                year: self.year.checked_add(1)?,
                month: 1,
            })
        } else {
            Some(Self {
                year: self.year,
                month: self.month + 1,
            })
        }
    }

    /// 月初日を返す（chronoの表現範囲外の年では`None`）
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// `other`より前かどうかを判定
    ///
    /// `other`が`Year`の場合は年の粒度で比較します。
    pub fn is_before(&self, other: impl Into<Period>) -> bool {
        Period::Month(*self).is_before(&other.into())
    }

    /// `other`より後かどうかを判定
    ///
    /// `other`が`Year`の場合は年の粒度で比較します。
    pub fn is_after(&self, other: impl Into<Period>) -> bool {
        Period::Month(*self).is_after(&other.into())
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.year, self.month)
    }
}

/// 期間（暦年または暦月）
///
/// `Year`と`CalendarMonth`は、年が同じでも等しくなりません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// 暦年
    Year(Year),
    /// 暦月
    Month(CalendarMonth),
}

impl Period {
    /// 期間の年を取得
    pub fn year(&self) -> i32 {
        match self {
            Period::Year(y) => y.year,
            Period::Month(m) => m.year,
        }
    }

    /// `other`より前かどうかを判定
    ///
    /// どちらかが`Year`の場合は年のみで比較し、
    /// 両方が`CalendarMonth`の場合は年、月の順で比較します。
    pub fn is_before(&self, other: &Period) -> bool {
        match (self, other) {
            (Period::Year(a), _) => a.year < other.year(),
            (Period::Month(a), Period::Year(b)) => a.year < b.year,
            (Period::Month(a), Period::Month(b)) => a < b,
        }
    }

    /// `other`より後かどうかを判定
    pub fn is_after(&self, other: &Period) -> bool {
        match (self, other) {
            (Period::Year(a), _) => a.year > other.year(),
            (Period::Month(a), Period::Year(b)) => a.year > b.year,
            (Period::Month(a), Period::Month(b)) => a > b,
        }
    }
}

impl From<Year> for Period {
    fn from(year: Year) -> Self {
        Period::Year(year)
    }
}

impl From<CalendarMonth> for Period {
    fn from(month: CalendarMonth) -> Self {
        Period::Month(month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Year(y) => y.fmt(f),
            Period::Month(m) => m.fmt(f),
        }
    }
}

/// `"2020"`または`"2020/03"`形式の文字列を解析
///
/// 年・月が整数として解釈できない場合は`InvalidType`、
/// 月が範囲外の場合は`MonthOutOfRange`を返します。
impl FromStr for Period {
    type Err = WonderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        let year_part = parts.next().unwrap_or_default();
        let month_part = parts.next();

        if parts.next().is_some() {
            return Err(WonderError::InvalidType(format!(
                "expected 'YYYY' or 'YYYY/MM', got '{}'",
                s
            )));
        }

        let year: i32 = year_part.trim().parse().map_err(|_| {
            WonderError::InvalidType(format!("year must be an integer: '{}'", year_part))
        })?;

        let Some(month_part) = month_part else {
            return Ok(Period::Year(Year::new(year)));
        };

        let month: i64 = month_part.trim().parse().map_err(|_| {
            WonderError::InvalidType(format!("month must be an integer: '{}'", month_part))
        })?;
        let month = u32::try_from(month).map_err(|_| WonderError::MonthOutOfRange(month))?;

        Ok(Period::Month(CalendarMonth::new(month, year)?))
    }
}

impl FromStr for Year {
    type Err = WonderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Period>()? {
            Period::Year(year) => Ok(year),
            Period::Month(_) => Err(WonderError::InvalidType(format!(
                "expected a year, got '{}'",
                s
            ))),
        }
    }
}

impl FromStr for CalendarMonth {
    type Err = WonderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Period>()? {
            Period::Month(month) => Ok(month),
            Period::Year(_) => Err(WonderError::InvalidType(format!(
                "expected a calendar month, got '{}'",
                s
            ))),
        }
    }
}

// シリアライズは表示形式の文字列、デシリアライズはFromStr経由（検証を迂回させない）

impl Serialize for Year {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for CalendarMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn deserialize_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = WonderError>,
{
    let text = String::deserialize(deserializer)?;
    text.parse().map_err(serde::de::Error::custom)
}

impl<'de> Deserialize<'de> for Year {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

impl<'de> Deserialize<'de> for CalendarMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(m: u32, y: i32) -> CalendarMonth {
        CalendarMonth::new(m, y).unwrap()
    }

    #[test]
    fn test_calendar_month_new() {
        let m = month(7, 1998);
        assert_eq!(m.month(), 7);
        assert_eq!(m.year(), 1998);
    }

    #[test]
    fn test_calendar_month_out_of_range() {
        for bad in [0, 13, 100] {
            match CalendarMonth::new(bad, 2020) {
                Err(WonderError::MonthOutOfRange(m)) => assert_eq!(m, i64::from(bad)),
                other => panic!("Expected MonthOutOfRange, got {:?}", other),
            }
        }
        assert!(CalendarMonth::new(1, 2020).is_ok());
        assert!(CalendarMonth::new(12, 2020).is_ok());
    }

    #[test]
    fn test_year_months() {
        let months: Vec<_> = Year::new(2020).months().collect();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], month(1, 2020));
        assert_eq!(months[11], month(12, 2020));
    }

    #[test]
    fn test_year_comparisons() {
        let y2020 = Year::new(2020);
        assert!(y2020.is_before(Year::new(2021)));
        assert!(!y2020.is_before(Year::new(2020)));
        assert!(y2020.is_after(Year::new(2019)));

        // 年の粒度で比較するため、同じ年の月とは前後関係なし
        assert!(!y2020.is_before(month(12, 2020)));
        assert!(!y2020.is_after(month(1, 2020)));
        assert!(y2020.is_before(month(1, 2021)));
        assert!(y2020.is_after(month(12, 2019)));
    }

    #[test]
    fn test_calendar_month_comparisons() {
        let mar = month(3, 2020);
        assert!(mar.is_before(month(4, 2020)));
        assert!(mar.is_before(month(1, 2021)));
        assert!(mar.is_after(month(2, 2020)));
        assert!(mar.is_after(month(12, 2019)));
        assert!(!mar.is_before(mar));
        assert!(!mar.is_after(mar));

        // Yearとの比較は年のみ
        assert!(!mar.is_before(Year::new(2020)));
        assert!(!mar.is_after(Year::new(2020)));
        assert!(mar.is_before(Year::new(2021)));
        assert!(mar.is_after(Year::new(2019)));
    }

    #[test]
    fn test_equality_between_kinds() {
        assert_eq!(Period::from(Year::new(2020)), Period::from(Year::new(2020)));
        assert_ne!(Period::from(Year::new(2020)), Period::from(month(1, 2020)));
        assert_ne!(month(1, 2020), month(1, 2021));
        assert_ne!(month(1, 2020), month(2, 2020));
    }

    #[test]
    fn test_ordering_by_year_then_month() {
        let mut months = vec![month(1, 2021), month(12, 2020), month(2, 2020)];
        months.sort();
        assert_eq!(months, vec![month(2, 2020), month(12, 2020), month(1, 2021)]);
    }

    #[test]
    fn test_succ_rollover() {
        assert_eq!(month(11, 2020).succ(), Some(month(12, 2020)));
        assert_eq!(month(12, 2020).succ(), Some(month(1, 2021)));
        assert_eq!(month(12, i32::MAX).succ(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Year::new(2020).to_string(), "2020");
        assert_eq!(month(3, 2020).to_string(), "2020/03");
        assert_eq!(month(11, 2020).to_string(), "2020/11");
        assert_eq!(Period::from(month(3, 2020)).to_string(), "2020/03");
    }

    #[test]
    fn test_parse_period() {
        assert_eq!("2020".parse::<Period>().unwrap(), Year::new(2020).into());
        assert_eq!("2020/03".parse::<Period>().unwrap(), month(3, 2020).into());
        assert_eq!(" 2020/3 ".parse::<CalendarMonth>().unwrap(), month(3, 2020));
        assert_eq!("1999".parse::<Year>().unwrap(), Year::new(1999));
    }

    #[test]
    fn test_parse_period_errors() {
        assert!(matches!(
            "abc".parse::<Period>(),
            Err(WonderError::InvalidType(_))
        ));
        assert!(matches!(
            "2020/x".parse::<Period>(),
            Err(WonderError::InvalidType(_))
        ));
        assert!(matches!(
            "2020/1/1".parse::<Period>(),
            Err(WonderError::InvalidType(_))
        ));
        assert!(matches!(
            "2020/13".parse::<Period>(),
            Err(WonderError::MonthOutOfRange(13))
        ));
        assert!(matches!(
            "2020/-1".parse::<Period>(),
            Err(WonderError::MonthOutOfRange(-1))
        ));
        assert!(matches!(
            "2020".parse::<CalendarMonth>(),
            Err(WonderError::InvalidType(_))
        ));
        assert!(matches!(
            "2020/01".parse::<Year>(),
            Err(WonderError::InvalidType(_))
        ));
    }

    #[test]
    fn test_chrono_interop() {
        let date = NaiveDate::from_ymd_opt(2021, 6, 15).unwrap();
        let m = CalendarMonth::from_date(&date);
        assert_eq!(m, month(6, 2021));
        assert_eq!(m.first_day(), NaiveDate::from_ymd_opt(2021, 6, 1));
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&month(3, 2020)).unwrap();
        assert_eq!(json, "\"2020/03\"");
        let back: CalendarMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month(3, 2020));

        let period: Period = serde_json::from_str("\"2019\"").unwrap();
        assert_eq!(period, Period::Year(Year::new(2019)));

        // 範囲外の月はデシリアライズでも拒否される
        assert!(serde_json::from_str::<CalendarMonth>("\"2020/13\"").is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_month() -> impl Strategy<Value = CalendarMonth> {
            (1u32..=12, 1900i32..2100).prop_map(|(m, y)| CalendarMonth::new(m, y).unwrap())
        }

        proptest! {
            #[test]
            fn test_month_comparison_matches_ord(a in any_month(), b in any_month()) {
                prop_assert_eq!(a.is_before(b), a < b);
                prop_assert_eq!(a.is_after(b), a > b);
                // 反対称性
                prop_assert!(!(a.is_before(b) && a.is_after(b)));
                prop_assert_eq!(a.is_before(b), b.is_after(a));
            }

            #[test]
            fn test_display_parse_identity(m in any_month()) {
                let parsed: CalendarMonth = m.to_string().parse().unwrap();
                prop_assert_eq!(parsed, m);
            }
        }
    }
}
