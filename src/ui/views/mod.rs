mod pokemon_detail;
mod pokemon_list;
mod type_list;

pub use pokemon_detail::PokemonDetailView;
pub use pokemon_list::PokemonListView;
pub use type_list::TypeListView;
