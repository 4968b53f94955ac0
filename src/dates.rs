//! Dates Module
//!
//! 暦年・暦月から、重複のない暦月の集合（正規化された月集合）を構築するモジュール。
//! 暦年は必ず12か月に展開してから格納するため、集合が`Year`を含むことはありません。

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::WonderError;
use crate::period::{CalendarMonth, Period, Year};

/// 暦月の集合
///
/// (年, 月)をキーとする順序付き集合で、挿入順は意味を持ちません。
/// ファクトリ関数（`of` / `range` / `union`）で生成した後は不変の値として扱います。
///
/// # 使用例
///
/// ```rust
/// use wondergrid::{CalendarMonth, PeriodSet, Year};
///
/// # fn main() -> Result<(), wondergrid::WonderError> {
/// let winter = PeriodSet::range(CalendarMonth::new(11, 2020)?, CalendarMonth::new(1, 2021)?)?;
/// let year = PeriodSet::of(Year::new(2019));
///
/// let both = PeriodSet::union(&winter, &year);
/// assert_eq!(both.len(), 15);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodSet {
    months: BTreeSet<CalendarMonth>,
}

impl PeriodSet {
    /// 単一の期間から集合を生成
    ///
    /// * `Year` - その年の1月〜12月の12要素
    /// * `CalendarMonth` - その月のみの1要素
    pub fn of(period: impl Into<Period>) -> Self {
        let months = match period.into() {
            Period::Year(year) => year.months().collect(),
            Period::Month(month) => BTreeSet::from([month]),
        };
        Self { months }
    }

    /// 開始期間から終了期間まで（両端を含む）の集合を生成
    ///
    /// # 引数
    ///
    /// * `begin` - 開始期間
    /// * `end` - 終了期間（`begin`と同じ種類であること）
    ///
    /// # 戻り値
    ///
    /// * `Ok(PeriodSet)` - 生成に成功した場合
    /// * `Err(WonderError::PeriodKindMismatch)` - `begin`と`end`の種類が異なる場合
    /// * `Err(WonderError::PeriodOrder)` - `begin`が`end`より後の場合
    ///
    /// 暦月の範囲は1か月ずつ進め、12月の次は翌年の1月になります。
    /// 例えば2020年11月〜2021年1月は3か月です。
    pub fn range(begin: impl Into<Period>, end: impl Into<Period>) -> Result<Self, WonderError> {
        let begin = begin.into();
        let end = end.into();

        let months = match (begin, end) {
            (Period::Year(first), Period::Year(last)) => {
                if first.is_after(last) {
                    return Err(WonderError::PeriodOrder { begin, end });
                }
                (first.year()..=last.year())
                    .flat_map(|year| Year::new(year).months())
                    .collect()
            }
            (Period::Month(first), Period::Month(last)) => {
                if first.is_after(last) {
                    return Err(WonderError::PeriodOrder { begin, end });
                }
                let mut months = BTreeSet::new();
                let mut current = first;
                loop {
                    months.insert(current);
                    if current == last {
                        break;
                    }
                    match current.succ() {
                        Some(next) => current = next,
                        None => break,
                    }
                }
                months
            }
            _ => return Err(WonderError::PeriodKindMismatch { begin, end }),
        };

        Ok(Self { months })
    }

    /// 2つの集合の和集合を新しい集合として返す
    ///
    /// 可換・結合的・冪等（`union(a, a) == a`）です。
    pub fn union(a: &PeriodSet, b: &PeriodSet) -> Self {
        Self {
            months: a.months.union(&b.months).copied().collect(),
        }
    }

    /// 含まれる暦月を取得
    ///
    /// 重複はありません。内部は(年, 月)順の集合なので、昇順で返されます。
    pub fn get_months(&self) -> Vec<CalendarMonth> {
        self.months.iter().copied().collect()
    }

    /// 暦月を(年, 月)の昇順で走査
    pub fn iter(&self) -> impl Iterator<Item = &CalendarMonth> {
        self.months.iter()
    }

    /// 指定した暦月を含むかどうか
    pub fn contains(&self, month: &CalendarMonth) -> bool {
        self.months.contains(month)
    }

    /// 要素数
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(m: u32, y: i32) -> CalendarMonth {
        CalendarMonth::new(m, y).unwrap()
    }

    #[test]
    fn test_of_year() {
        let set = PeriodSet::of(Year::new(2020));
        let months = set.get_months();

        assert_eq!(months.len(), 12);
        for m in 1..=12 {
            assert!(set.contains(&month(m, 2020)));
        }
        // 重複がないこと
        let unique: BTreeSet<_> = months.iter().collect();
        assert_eq!(unique.len(), months.len());
    }

    #[test]
    fn test_of_month() {
        let set = PeriodSet::of(month(5, 2020));
        assert_eq!(set.get_months(), vec![month(5, 2020)]);
    }

    #[test]
    fn test_range_months_within_year() {
        let set = PeriodSet::range(month(1, 2020), month(3, 2020)).unwrap();
        assert_eq!(
            set.get_months(),
            vec![month(1, 2020), month(2, 2020), month(3, 2020)]
        );
    }

    #[test]
    fn test_range_months_year_rollover() {
        let set = PeriodSet::range(month(11, 2020), month(1, 2021)).unwrap();
        assert_eq!(
            set.get_months(),
            vec![month(11, 2020), month(12, 2020), month(1, 2021)]
        );
    }

    #[test]
    fn test_iter_ascending() {
        let set = PeriodSet::union(
            &PeriodSet::of(month(2, 2021)),
            &PeriodSet::of(month(12, 2020)),
        );
        let months: Vec<_> = set.iter().copied().collect();
        assert_eq!(months, vec![month(12, 2020), month(2, 2021)]);
    }

    #[test]
    fn test_range_single_month() {
        let set = PeriodSet::range(month(6, 2020), month(6, 2020)).unwrap();
        assert_eq!(set.get_months(), vec![month(6, 2020)]);
    }

    #[test]
    fn test_range_years() {
        let set = PeriodSet::range(Year::new(2018), Year::new(2020)).unwrap();
        assert_eq!(set.len(), 36);
        assert!(set.contains(&month(1, 2018)));
        assert!(set.contains(&month(12, 2020)));
        assert!(!set.contains(&month(1, 2021)));
    }

    #[test]
    fn test_range_order_error() {
        match PeriodSet::range(month(3, 2020), month(1, 2020)) {
            Err(WonderError::PeriodOrder { begin, end }) => {
                assert_eq!(begin, month(3, 2020).into());
                assert_eq!(end, month(1, 2020).into());
            }
            other => panic!("Expected PeriodOrder error, got {:?}", other),
        }

        assert!(matches!(
            PeriodSet::range(Year::new(2021), Year::new(2020)),
            Err(WonderError::PeriodOrder { .. })
        ));
    }

    #[test]
    fn test_range_kind_mismatch() {
        assert!(matches!(
            PeriodSet::range(Year::new(2020), month(1, 2020)),
            Err(WonderError::PeriodKindMismatch { .. })
        ));
        assert!(matches!(
            PeriodSet::range(month(1, 2020), Year::new(2021)),
            Err(WonderError::PeriodKindMismatch { .. })
        ));
        // 順序が逆でも種類の不一致を優先して報告する
        assert!(matches!(
            PeriodSet::range(Year::new(2021), month(1, 2020)),
            Err(WonderError::PeriodKindMismatch { .. })
        ));
    }

    #[test]
    fn test_union() {
        let a = PeriodSet::range(month(1, 2020), month(3, 2020)).unwrap();
        let b = PeriodSet::range(month(3, 2020), month(5, 2020)).unwrap();

        let u = PeriodSet::union(&a, &b);
        assert_eq!(u.len(), 5);
        assert_eq!(u, PeriodSet::union(&b, &a));
        assert_eq!(PeriodSet::union(&a, &a), a);

        // 元の集合は変更されない
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn test_union_with_empty() {
        let a = PeriodSet::of(Year::new(2020));
        assert_eq!(PeriodSet::union(&a, &PeriodSet::default()), a);
        assert!(PeriodSet::default().is_empty());
    }

    #[test]
    fn test_serde_sequence() {
        let set = PeriodSet::range(month(12, 2020), month(1, 2021)).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["2020/12","2021/01"]"#);

        let back: PeriodSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_month() -> impl Strategy<Value = CalendarMonth> {
            (1u32..=12, 1990i32..2030).prop_map(|(m, y)| CalendarMonth::new(m, y).unwrap())
        }

        fn any_set() -> impl Strategy<Value = PeriodSet> {
            prop_oneof![
                any_month().prop_map(PeriodSet::of),
                (1990i32..2030).prop_map(|y| PeriodSet::of(Year::new(y))),
                (any_month(), any_month()).prop_map(|(a, b)| {
                    let (begin, end) = if a <= b { (a, b) } else { (b, a) };
                    PeriodSet::range(begin, end).unwrap()
                }),
            ]
        }

        proptest! {
            #[test]
            fn test_union_commutative(a in any_set(), b in any_set()) {
                prop_assert_eq!(PeriodSet::union(&a, &b), PeriodSet::union(&b, &a));
            }

            #[test]
            fn test_union_idempotent(a in any_set()) {
                prop_assert_eq!(PeriodSet::union(&a, &a), a);
            }

            #[test]
            fn test_union_associative(a in any_set(), b in any_set(), c in any_set()) {
                let left = PeriodSet::union(&PeriodSet::union(&a, &b), &c);
                let right = PeriodSet::union(&a, &PeriodSet::union(&b, &c));
                prop_assert_eq!(left, right);
            }

            #[test]
            fn test_range_cardinality(a in any_month(), b in any_month()) {
                let (begin, end) = if a <= b { (a, b) } else { (b, a) };
                let set = PeriodSet::range(begin, end).unwrap();

                let expected = (end.year() - begin.year()) as i64 * 12
                    + end.month() as i64
                    - begin.month() as i64
                    + 1;
                prop_assert_eq!(set.len() as i64, expected);
                prop_assert!(set.contains(&begin));
                prop_assert!(set.contains(&end));
            }
        }
    }
}
