use crate::Entity;

use linkrow_core::schema;

/// A statically registered model.
///
/// ```ignore
/// struct Movie;
///
/// impl Model for Movie {
///     const NAME: &'static str = "Movie";
///
///     fn schema() -> schema::Model {
///         schema::Model::new(
///             Self::NAME,
///             Table::new("ss_movie").id("id").column("name", Type::String),
///         )
///         .relation(Relation::many_to_many("posters", "Poster").cascade(Cascade::ALL))
///     }
/// }
/// ```
pub trait Model {
    /// Name the model is registered and referred to by.
    const NAME: &'static str;

    /// Table and relation declarations.
    fn schema() -> schema::Model;

    /// A new, empty entity of this model.
    fn entity() -> Entity {
        Entity::new(Self::NAME)
    }
}
