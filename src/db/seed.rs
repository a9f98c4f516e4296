//! # Datos de demostración
//!
//! Al arrancar, si no hay locales, se insertan quince locales sintéticos y un
//! usuario demo (`demo@cyber.com` / `password`).

use rand::seq::SliceRandom;
use rand::Rng;
use crate::api::AppResult;
use super::models::{User, Venue};
use super::Store;

const AREAS: [&str; 5] = ["Andheri", "Bandra", "Powai", "Juhu", "Colaba"];

pub const VENUE_NAMES: [&str; 15] = [
    "Neon Nexus", "Cyber Hive", "Glitch Gaming", "Vertex Lounge", "Obsidian Den",
    "Pixel Point", "Matrix Zone", "Netrunner Hub", "Synthetix", "Void Café",
    "Bit Bunker", "Circuit City", "Holo Haven", "Quantum Quay", "Zion Gate",
];

const PC_GAMES: [&str; 7] = [
    "Valorant", "CS2", "Dota 2", "League of Legends", "Fortnite", "PUBG", "Age of Empires",
];

const CONSOLE_GAMES: [&str; 6] = [
    "Warzone", "Apex Legends", "FIFA 24", "GTA V", "Spider-Man", "Tekken 8",
];

const PRICES: [i64; 5] = [150, 200, 250, 300, 400];

const IMAGE_URLS: [&str; 15] = [
    "https://images.unsplash.com/photo-1542751371-adc38448a05e?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1538481199705-c710c4e965fc?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1552820728-8b83bb6b773f?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1593508512255-86ab42a8e620?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1550745165-9bc0b252726f?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1612287230217-9694659afa18?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1511512578047-dfb367046420?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1574375927938-d5a98e8efe30?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1605901309584-818e25960b8f?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1628143229871-70d592473461?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1589241062272-c0a000072dfa?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1551103782-8ab07afd45c1?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1598550476439-cce86041e880?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1614680376573-df3480f0c6ff?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1650392305713-fbce880628e9?auto=format&fit=crop&w=800&q=80",
];

const DIRECTIONS: [&str; 4] = ["Near", "Opposite", "Behind", "Next to"];
const LANDMARKS: [&str; 5] = ["Metro Station", "City Mall", "Bus Depot", "Central Park", "Tech Plaza"];
const GPUS: [&str; 3] = ["3060", "3080", "4090"];
const REFRESH_RATES: [&str; 2] = ["144Hz", "240Hz"];

pub const DEMO_EMAIL: &str = "demo@cyber.com";

/// Resultado de una pasada del seeder
#[derive(Debug, Default, PartialEq)]
pub struct SeedReport {
    pub venues_created: usize,
    pub demo_user_created: bool,
}

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Genera los locales sintéticos, uno por nombre, con imágenes sin repetir
pub fn mock_venues<R: Rng>(rng: &mut R) -> Vec<Venue> {
    let mut images = IMAGE_URLS.to_vec();
    images.shuffle(rng);

    VENUE_NAMES
        .iter()
        .zip(images)
        .map(|(name, image_url)| {
            let mut games: Vec<&str> = PC_GAMES.choose_multiple(rng, 4).copied().collect();
            games.extend(CONSOLE_GAMES.choose_multiple(rng, 2).copied());

            Venue {
                id: None,
                name: name.to_string(),
                area: pick(rng, &AREAS).to_string(),
                price_per_hour: PRICES.choose(rng).copied().unwrap_or(PRICES[0]),
                rating: round_one_decimal(rng.gen_range(3.5..=5.0)),
                distance_km: round_one_decimal(rng.gen_range(0.5..=15.0)),
                image_url: image_url.to_string(),
                logo_url: format!(
                    "https://robohash.org/{}?set=set1&bgset=bg1",
                    name.replace(' ', "")
                ),
                travel_info: format!(
                    "{} {} ({} min walk)",
                    pick(rng, &DIRECTIONS),
                    pick(rng, &LANDMARKS),
                    rng.gen_range(2..=10)
                ),
                specs: format!(
                    "RTX {}, {} Monitors",
                    pick(rng, &GPUS),
                    pick(rng, &REFRESH_RATES)
                ),
                games: games.join(", "),
            }
        })
        .collect()
}

pub fn demo_user() -> User {
    User {
        id: None,
        username: "NetRunner".to_string(),
        email: DEMO_EMAIL.to_string(),
        password: "password".to_string(),
        phone: "9876543210".to_string(),
    }
}

/// Inserta los datos de demostración que falten
pub async fn seed_mock_data(store: &dyn Store) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    if store.has_venues().await? {
        tracing::debug!("Venues already present, skipping seed");
        return Ok(report);
    }

    tracing::info!(backend = store.backend(), "Seeding database with mock data");

    let venues = mock_venues(&mut rand::thread_rng());
    for venue in venues {
        store.insert_venue(venue).await?;
        report.venues_created += 1;
    }

    if store.find_user_by_email(DEMO_EMAIL).await?.is_none() {
        store.insert_user(demo_user()).await?;
        report.demo_user_created = true;
    }

    tracing::info!(
        venues = report.venues_created,
        demo_user = report.demo_user_created,
        "Mock data created"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_mock_venues_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let venues = mock_venues(&mut rng);

        assert_eq!(venues.len(), VENUE_NAMES.len());

        let images: HashSet<_> = venues.iter().map(|v| v.image_url.as_str()).collect();
        assert_eq!(images.len(), venues.len());

        for venue in &venues {
            assert!(AREAS.contains(&venue.area.as_str()));
            assert!(PRICES.contains(&venue.price_per_hour));
            assert!((3.5..=5.0).contains(&venue.rating));
            assert!((0.5..=15.0).contains(&venue.distance_km));
            assert!(venue.specs.starts_with("RTX "));
            assert!(venue.travel_info.ends_with("min walk)"));

            let games: Vec<_> = venue.games.split(", ").collect();
            assert_eq!(games.len(), 6);
            assert_eq!(games.iter().collect::<HashSet<_>>().len(), 6);
        }

        assert_eq!(
            venues[0].logo_url,
            "https://robohash.org/NeonNexus?set=set1&bgset=bg1"
        );
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(4.26), 4.3);
        assert_eq!(round_one_decimal(3.5), 3.5);
    }

    #[tokio::test]
    async fn test_seed_runs_once() {
        let store = MemoryStore::new();

        let first = seed_mock_data(&store).await.unwrap();
        assert_eq!(first.venues_created, 15);
        assert!(first.demo_user_created);

        let second = seed_mock_data(&store).await.unwrap();
        assert_eq!(second, SeedReport::default());

        let demo = store.find_user_by_email(DEMO_EMAIL).await.unwrap().unwrap();
        assert_eq!(demo.username, "NetRunner");
        assert_eq!(store.list_venues(None).await.unwrap().len(), 15);
    }
}
