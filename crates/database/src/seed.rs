use crate::DbError;
use core_types::County;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;

/// One row of the canonical county list.
#[derive(Debug, Clone, Copy)]
pub struct SeedCounty {
    pub id: i32,
    pub name: &'static str,
    pub code: &'static str,
    pub former_province: &'static str,
    pub area_sq_km: Decimal,
}

impl SeedCounty {
    pub fn to_county(&self) -> County {
        County {
            id: self.id,
            name: self.name.to_string(),
            code: self.code.to_string(),
            former_province: Some(self.former_province.to_string()),
            area_sq_km: self.area_sq_km,
        }
    }
}

const fn county(
    id: i32,
    name: &'static str,
    code: &'static str,
    former_province: &'static str,
    area_sq_km: Decimal,
) -> SeedCounty {
    SeedCounty { id, name, code, former_province, area_sq_km }
}

/// The 47 counties established by the 2010 constitution, in official code order.
pub const COUNTIES: [SeedCounty; 47] = [
    county(1, "Mombasa", "001", "Coast", dec!(212.5)),
    county(2, "Kwale", "002", "Coast", dec!(8270.3)),
    county(3, "Kilifi", "003", "Coast", dec!(12245.9)),
    county(4, "Tana River", "004", "Coast", dec!(35375.8)),
    county(5, "Lamu", "005", "Coast", dec!(6497.7)),
    county(6, "Taita Taveta", "006", "Coast", dec!(17083.9)),
    county(7, "Garissa", "007", "North Eastern", dec!(45720.2)),
    county(8, "Wajir", "008", "North Eastern", dec!(55840.6)),
    county(9, "Mandera", "009", "North Eastern", dec!(25797.7)),
    county(10, "Marsabit", "010", "Eastern", dec!(66923.1)),
    county(11, "Isiolo", "011", "Eastern", dec!(25336.1)),
    county(12, "Meru", "012", "Eastern", dec!(7003.1)),
    county(13, "Tharaka-Nithi", "013", "Eastern", dec!(2609.5)),
    county(14, "Embu", "014", "Eastern", dec!(2818.0)),
    county(15, "Kitui", "015", "Eastern", dec!(24385.1)),
    county(16, "Machakos", "016", "Eastern", dec!(5952.9)),
    county(17, "Makueni", "017", "Eastern", dec!(8008.9)),
    county(18, "Nyandarua", "018", "Central", dec!(3107.7)),
    county(19, "Nyeri", "019", "Central", dec!(2361.0)),
    county(20, "Kirinyaga", "020", "Central", dec!(1205.4)),
    county(21, "Murang'a", "021", "Central", dec!(2325.8)),
    county(22, "Kiambu", "022", "Central", dec!(2449.2)),
    county(23, "Turkana", "023", "Rift Valley", dec!(71597.8)),
    county(24, "West Pokot", "024", "Rift Valley", dec!(8418.2)),
    county(25, "Samburu", "025", "Rift Valley", dec!(20182.5)),
    county(26, "Trans Nzoia", "026", "Rift Valley", dec!(2469.9)),
    county(27, "Uasin Gishu", "027", "Rift Valley", dec!(2955.3)),
    county(28, "Elgeyo-Marakwet", "028", "Rift Valley", dec!(3049.7)),
    county(29, "Nandi", "029", "Rift Valley", dec!(2884.5)),
    county(30, "Baringo", "030", "Rift Valley", dec!(11075.3)),
    county(31, "Laikipia", "031", "Rift Valley", dec!(8696.1)),
    county(32, "Nakuru", "032", "Rift Valley", dec!(7509.5)),
    county(33, "Narok", "033", "Rift Valley", dec!(17921.2)),
    county(34, "Kajiado", "034", "Rift Valley", dec!(21292.7)),
    county(35, "Kericho", "035", "Rift Valley", dec!(2454.5)),
    county(36, "Bomet", "036", "Rift Valley", dec!(1997.9)),
    county(37, "Kakamega", "037", "Western", dec!(3033.8)),
    county(38, "Vihiga", "038", "Western", dec!(531.3)),
    county(39, "Bungoma", "039", "Western", dec!(2206.9)),
    county(40, "Busia", "040", "Western", dec!(1628.4)),
    county(41, "Siaya", "041", "Nyanza", dec!(2496.1)),
    county(42, "Kisumu", "042", "Nyanza", dec!(2009.5)),
    county(43, "Homa Bay", "043", "Nyanza", dec!(3154.7)),
    county(44, "Migori", "044", "Nyanza", dec!(2586.4)),
    county(45, "Kisii", "045", "Nyanza", dec!(1317.9)),
    county(46, "Nyamira", "046", "Nyanza", dec!(912.5)),
    county(47, "Nairobi City", "047", "Nairobi", dec!(694.9)),
];

/// Outcome of a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub created: usize,
    /// Rows that already existed and were left untouched.
    pub skipped: usize,
}

/// Loads [`COUNTIES`] inside a single transaction.
///
/// Existing rows are never overwritten, so running the seeder twice is safe.
pub async fn seed_counties(pool: &PgPool) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for county in &COUNTIES {
        let result = sqlx::query(
            r#"
            INSERT INTO counties (id, name, code, former_province, area_sq_km)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(county.id)
        .bind(county.name)
        .bind(county.code)
        .bind(county.former_province)
        .bind(county.area_sq_km)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(county = county.name, "Created county.");
            summary.created += 1;
        } else {
            tracing::warn!(county = county.name, "Skipping county, already exists.");
            summary.skipped += 1;
        }
    }

    tx.commit().await?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_run_from_one_to_forty_seven() {
        let ids: Vec<i32> = COUNTIES.iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=47).collect::<Vec<_>>());
    }

    #[test]
    fn codes_are_zero_padded_and_unique() {
        let codes: HashSet<&str> = COUNTIES.iter().map(|c| c.code).collect();
        assert_eq!(codes.len(), COUNTIES.len());

        for county in &COUNTIES {
            assert_eq!(county.code, format!("{:03}", county.id));
        }
    }

    #[test]
    fn areas_are_exact_decimals() {
        let mombasa = COUNTIES[0].to_county();
        assert_eq!(mombasa.name, "Mombasa");
        assert_eq!(mombasa.area_sq_km, dec!(212.5));
        assert_eq!(mombasa.former_province.as_deref(), Some("Coast"));

        let nairobi = &COUNTIES[46];
        assert_eq!(nairobi.code, "047");
        assert_eq!(nairobi.area_sq_km.to_string(), "694.9");
    }
}
