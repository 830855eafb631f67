use linkrow::{schema, Cascade, Model, Relation, Table, Type};

pub struct Movie;

impl Model for Movie {
    const NAME: &'static str = "Movie";

    fn schema() -> schema::Model {
        schema::Model::new(
            Self::NAME,
            stamped(
                Table::new("ss_movie")
                    .id("id")
                    .column("name", Type::String)
                    .column("year", Type::I32),
            ),
        )
        .relation(Relation::many_to_many("posters", Poster::NAME).cascade(Cascade::ALL))
        .relation(
            Relation::one_to_many("actors", MovieMan::NAME)
                .cascade(Cascade::INSERT | Cascade::UPDATE),
        )
    }
}

pub struct Poster;

impl Model for Poster {
    const NAME: &'static str = "Poster";

    fn schema() -> schema::Model {
        schema::Model::new(
            Self::NAME,
            stamped(Table::new("ss_poster").id("id").column("url", Type::String)),
        )
    }
}

pub struct MovieMan;

impl Model for MovieMan {
    const NAME: &'static str = "MovieMan";

    fn schema() -> schema::Model {
        schema::Model::new(
            Self::NAME,
            stamped(Table::new("ss_movie_man").id("id").column("name", Type::String)),
        )
    }
}

/// A model without timestamp columns.
pub struct Note;

impl Model for Note {
    const NAME: &'static str = "Note";

    fn schema() -> schema::Model {
        schema::Model::new(
            Self::NAME,
            Table::new("ss_note").id("id").column("body", Type::String),
        )
    }
}

fn stamped(table: Table) -> Table {
    table
        .column("create_date", Type::DateTime)
        .column("modify_date", Type::DateTime)
}
