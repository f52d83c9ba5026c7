//! Static table model: the three tables the gateway exposes and how they relate.

/// Direction of an embed: to_one (we hold the FK to them) or to_many (they hold the FK to us).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbedDirection {
    ToOne,
    ToMany,
}

#[derive(Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    /// PostgreSQL type used for parameter casts (e.g. "date").
    pub pg_type: &'static str,
    pub nullable: bool,
}

#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub pk: &'static str,
    /// Columns the gateway writes. Reads always return every column the store has.
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A related table that can be embedded in rows of `owner`. `name` is the key the embed appears under.
#[derive(Debug)]
pub struct Relation {
    pub name: &'static str,
    pub owner: &'static TableDef,
    pub related: &'static TableDef,
    pub direction: EmbedDirection,
    /// Our column in the join (our FK for to_one; our PK for to_many).
    pub our_key: &'static str,
    /// Their column in the join (their PK for to_one; their FK for to_many).
    pub their_key: &'static str,
}

/// `table.column` references `references.pk`.
#[derive(Debug)]
pub struct ForeignKey {
    pub table: &'static TableDef,
    pub column: &'static str,
    pub references: &'static TableDef,
}

const fn col(name: &'static str, pg_type: &'static str, nullable: bool) -> ColumnDef {
    ColumnDef { name, pg_type, nullable }
}

pub static CLIENTES: TableDef = TableDef {
    name: "clientes",
    pk: "id",
    columns: &[
        col("id", "int8", false),
        col("nombre_contacto", "text", false),
        col("empresa", "text", false),
        col("email", "text", false),
        col("telefono", "text", true),
        col("estado", "text", true),
    ],
};

pub static PROYECTOS: TableDef = TableDef {
    name: "proyectos",
    pk: "id",
    columns: &[
        col("id", "int8", false),
        col("cliente_id", "int8", false),
        col("nombre_proyecto", "text", false),
        col("descripcion", "text", true),
        col("fecha_inicio", "date", false),
        col("fecha_fin", "date", true),
        col("estado", "text", true),
    ],
};

pub static TAREAS: TableDef = TableDef {
    name: "tareas",
    pk: "id",
    columns: &[
        col("id", "int8", false),
        col("proyecto_id", "int8", false),
        col("titulo", "text", false),
        col("descripcion", "text", true),
        col("estado", "text", true),
        col("fecha_limite", "date", true),
    ],
};

/// Every project of a client, all columns.
pub static CLIENTE_PROYECTOS: Relation = Relation {
    name: "proyectos",
    owner: &CLIENTES,
    related: &PROYECTOS,
    direction: EmbedDirection::ToMany,
    our_key: "id",
    their_key: "cliente_id",
};

/// The owning client of a project.
pub static PROYECTO_CLIENTE: Relation = Relation {
    name: "clientes",
    owner: &PROYECTOS,
    related: &CLIENTES,
    direction: EmbedDirection::ToOne,
    our_key: "cliente_id",
    their_key: "id",
};

pub static FOREIGN_KEYS: &[ForeignKey] = &[
    ForeignKey { table: &PROYECTOS, column: "cliente_id", references: &CLIENTES },
    ForeignKey { table: &TAREAS, column: "proyecto_id", references: &PROYECTOS },
];

pub static TABLES: &[&TableDef] = &[&CLIENTES, &PROYECTOS, &TAREAS];
