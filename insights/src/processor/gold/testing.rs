use crate::processor::bronze::Rating;
use crate::processor::silver::{PriceCategory, RateCategory, Restaurant, Snapshot};

pub struct RestaurantBuilder {
    restaurant: Restaurant,
}

impl RestaurantBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            restaurant: Restaurant {
                row: 0,
                id: id.to_string(),
                name: format!("Restaurant {id}"),
                country_code: "1".to_string(),
                country_name: "India".to_string(),
                city: Some("Pune".to_string()),
                locality: Some("Koregaon Park".to_string()),
                cuisines: Vec::new(),
                rating: Rating::from_tenths(40),
                votes: Some(100),
                average_cost_for_two: Some(500.0),
                price_range: Some(2),
                has_online_delivery: Some(true),
                has_table_booking: Some(false),
                rate_category: RateCategory::Unrated,
                price_category: PriceCategory::Unknown,
            },
        }
    }

    pub fn country(mut self, name: &str) -> Self {
        self.restaurant.country_name = name.to_string();
        self
    }

    pub fn city(mut self, city: &str) -> Self {
        self.restaurant.city = Some(city.to_string());
        self
    }

    pub fn no_city(mut self) -> Self {
        self.restaurant.city = None;
        self
    }

    pub fn locality(mut self, locality: &str) -> Self {
        self.restaurant.locality = Some(locality.to_string());
        self
    }

    pub fn cuisines(mut self, cuisines: &[&str]) -> Self {
        self.restaurant.cuisines = cuisines.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.restaurant.rating = Rating::from_tenths((rating * 10.0).round() as u8);
        self
    }

    pub fn unrated(mut self) -> Self {
        self.restaurant.rating = None;
        self
    }

    pub fn votes(mut self, votes: u32) -> Self {
        self.restaurant.votes = Some(votes);
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.restaurant.average_cost_for_two = Some(cost);
        self
    }

    pub fn no_cost(mut self) -> Self {
        self.restaurant.average_cost_for_two = None;
        self
    }

    pub fn price(mut self, price_range: u8) -> Self {
        self.restaurant.price_range = Some(price_range);
        self
    }

    pub fn delivery(mut self, on: bool) -> Self {
        self.restaurant.has_online_delivery = Some(on);
        self
    }

    pub fn booking(mut self, on: bool) -> Self {
        self.restaurant.has_table_booking = Some(on);
        self
    }

    pub fn no_flags(mut self) -> Self {
        self.restaurant.has_online_delivery = None;
        self.restaurant.has_table_booking = None;
        self
    }

    pub fn build(mut self) -> Restaurant {
        self.restaurant.rate_category = RateCategory::from_rating(self.restaurant.rating);
        self.restaurant.price_category = PriceCategory::from_price_range(self.restaurant.price_range);
        self.restaurant
    }
}

pub fn snapshot(mut restaurants: Vec<Restaurant>) -> Snapshot {
    for (row, restaurant) in restaurants.iter_mut().enumerate() {
        restaurant.row = row;
    }
    Snapshot::new(restaurants)
}
