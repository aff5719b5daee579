//! Small M5-shaped tables shared by the pipeline tests.
//!
//! Two series in store CA_1 over ten days starting Saturday 2011-01-29:
//! - FOODS_1_001 is priced from week 11101, so all ten days survive.
//! - HOBBIES_1_002 is priced from week 11102 only, so its first seven
//!   days (week 11101) are dropped by the release filter.

use polars::prelude::*;

pub(crate) const FOODS: &str = "FOODS_1_001_CA_1";
pub(crate) const HOBBIES: &str = "HOBBIES_1_002_CA_1";

pub(crate) fn sales() -> DataFrame {
    df!(
        "id" => &["FOODS_1_001_CA_1_validation", "HOBBIES_1_002_CA_1_validation"],
        "item_id" => &["FOODS_1_001", "HOBBIES_1_002"],
        "dept_id" => &["FOODS_1", "HOBBIES_1"],
        "cat_id" => &["FOODS", "HOBBIES"],
        "store_id" => &["CA_1", "CA_1"],
        "state_id" => &["CA", "CA"],
        "d_1" => &[3i64, 0],
        "d_2" => &[0i64, 0],
        "d_3" => &[0i64, 0],
        "d_4" => &[1i64, 0],
        "d_5" => &[4i64, 0],
        "d_6" => &[2i64, 0],
        "d_7" => &[0i64, 0],
        "d_8" => &[1i64, 1],
        "d_9" => &[5i64, 0],
        "d_10" => &[2i64, 2],
    )
    .unwrap()
}

pub(crate) fn calendar() -> DataFrame {
    df!(
        "date" => &[
            "2011-01-29", "2011-01-30", "2011-01-31", "2011-02-01", "2011-02-02",
            "2011-02-03", "2011-02-04", "2011-02-05", "2011-02-06", "2011-02-07",
        ],
        "wm_yr_wk" => &[11101i64, 11101, 11101, 11101, 11101, 11101, 11101, 11102, 11102, 11102],
        "weekday" => &[
            "Saturday", "Sunday", "Monday", "Tuesday", "Wednesday",
            "Thursday", "Friday", "Saturday", "Sunday", "Monday",
        ],
        "event_name_1" => &[
            None, None, Some("PurimEnd"), None, None, None, None, None, Some("SuperBowl"), None,
        ],
        "event_type_1" => &[
            None, None, Some("Religious"), None, None, None, None, None, Some("Sporting"), None,
        ],
        "event_name_2" => &[
            None::<&str>, None, Some("Festival"), None, None, None, None, None, None, None,
        ],
        "event_type_2" => &[
            None::<&str>, None, Some("Cultural"), None, None, None, None, None, None, None,
        ],
    )
    .unwrap()
}

pub(crate) fn sell_prices() -> DataFrame {
    df!(
        "store_id" => &["CA_1", "CA_1", "CA_1"],
        "item_id" => &["FOODS_1_001", "FOODS_1_001", "HOBBIES_1_002"],
        "wm_yr_wk" => &[11101i64, 11102, 11102],
        "sell_price" => &[2.0f64, 2.24, 8.97],
    )
    .unwrap()
}
