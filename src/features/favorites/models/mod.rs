mod favorite_city;

pub use favorite_city::FavoriteCity;
