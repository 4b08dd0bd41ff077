//! CREATE TABLE / ALTER TABLE tests.

use pretty_assertions::assert_eq;

use crate::error::QailError;
use crate::schema::*;
use crate::transpiler::*;

fn sql(statements: Vec<CompiledQuery>) -> Vec<String> {
    statements.into_iter().map(|q| q.sql).collect()
}

fn users_table() -> CreateTable {
    CreateTable::build("users", |t| {
        t.integer("id").autoincrement();
        t.string("email", 120).not_null().unique();
        t.boolean("active").default_value(true);
        t.text("bio").description("About me");
        t.timestamp("created_at");
        t.index(["created_at"]);
    })
}

// ============= CREATE TABLE =============

#[test]
fn test_create_table_mysql() {
    let mut table = users_table();
    table.engine("InnoDB");
    let statements = sql(compile_create(&table, Dialect::MySQL).unwrap());
    assert_eq!(
        statements,
        vec![
            "CREATE TABLE users (\n    \
             id INT AUTO_INCREMENT NOT NULL,\n    \
             email VARCHAR(120) NOT NULL,\n    \
             active TINYINT(1) DEFAULT 1,\n    \
             bio TEXT COMMENT 'About me',\n    \
             created_at TIMESTAMP,\n    \
             CONSTRAINT users_pk_id PRIMARY KEY (id),\n    \
             CONSTRAINT users_uk_email UNIQUE (email),\n    \
             INDEX users_ik_created_at (created_at)\n\
             ) ENGINE = InnoDB"
                .to_string()
        ]
    );
}

#[test]
fn test_create_table_postgres() {
    let statements = sql(compile_create(&users_table(), Dialect::Postgres).unwrap());
    assert_eq!(
        statements,
        vec![
            "CREATE TABLE users (\n    \
             id SERIAL NOT NULL,\n    \
             email VARCHAR(120) NOT NULL,\n    \
             active BOOLEAN DEFAULT TRUE,\n    \
             bio TEXT,\n    \
             created_at TIMESTAMP,\n    \
             CONSTRAINT users_pk_id PRIMARY KEY (id),\n    \
             CONSTRAINT users_uk_email UNIQUE (email)\n\
             )"
            .to_string(),
            "CREATE INDEX users_ik_created_at ON users (created_at)".to_string(),
            "COMMENT ON COLUMN users.bio IS 'About me'".to_string(),
        ]
    );
}

#[test]
fn test_create_table_sqlite() {
    let statements = sql(compile_create(&users_table(), Dialect::SQLite).unwrap());
    assert_eq!(
        statements,
        vec![
            "CREATE TABLE users (\n    \
             id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,\n    \
             email VARCHAR(120) NOT NULL,\n    \
             active BOOLEAN DEFAULT 1,\n    \
             bio TEXT,\n    \
             created_at DATETIME,\n    \
             CONSTRAINT users_uk_email UNIQUE (email)\n\
             )"
            .to_string(),
            "CREATE INDEX users_ik_created_at ON users (created_at)".to_string(),
        ]
    );
}

#[test]
fn test_create_table_sqlserver() {
    let statements = sql(compile_create(&users_table(), Dialect::SqlServer).unwrap());
    assert_eq!(statements.len(), 3);
    assert_eq!(
        statements[0],
        "CREATE TABLE users (\n    \
         id INTEGER IDENTITY NOT NULL,\n    \
         email NVARCHAR(120) NOT NULL,\n    \
         active BIT DEFAULT 1,\n    \
         bio NVARCHAR(MAX),\n    \
         created_at DATETIME,\n    \
         CONSTRAINT users_pk_id PRIMARY KEY (id),\n    \
         CONSTRAINT users_uk_email UNIQUE (email)\n\
         )"
    );
    assert_eq!(statements[1], "CREATE INDEX users_ik_created_at ON users (created_at)");
    assert!(statements[2].starts_with(
        "EXEC sp_addextendedproperty @name = N'MS_Description', @value = N'About me'"
    ));
    assert!(statements[2].ends_with(
        "@level1name = N'users', @level2type = N'COLUMN', @level2name = N'bio'"
    ));
}

#[test]
fn test_autoincrement_size_and_column_order() {
    let table = CreateTable::build("events", |t| {
        t.string("kind", 20);
        t.integer("id").size(Size::Big).autoincrement();
        t.text("payload").size(Size::Big);
    });

    let pg = sql(compile_create(&table, Dialect::Postgres).unwrap());
    assert_eq!(
        pg[0],
        "CREATE TABLE events (\n    \
         kind VARCHAR(20),\n    \
         id BIGSERIAL NOT NULL,\n    \
         payload TEXT,\n    \
         CONSTRAINT events_pk_id PRIMARY KEY (id)\n\
         )"
    );

    let mysql = sql(compile_create(&table, Dialect::MySQL).unwrap());
    assert!(mysql[0].contains("    id BIGINT AUTO_INCREMENT NOT NULL,\n"));
    assert!(mysql[0].contains("    payload LONGTEXT,\n"));
    assert!(mysql[0].find("kind").unwrap() < mysql[0].find("id BIGINT").unwrap());

    let mssql = sql(compile_create(&table, Dialect::SqlServer).unwrap());
    assert!(mssql[0].contains("    id BIGINT IDENTITY NOT NULL,\n"));
}

#[test]
fn test_foreign_keys() {
    let table = CreateTable::build("orders", |t| {
        t.integer("id").primary();
        t.integer("user_id")
            .not_null()
            .foreign("users", "id")
            .on_delete(ReferentialAction::Cascade);
        t.integer("shop_id");
        t.foreign_named("orders_shop", ["shop_id"])
            .references("shops", ["id"])
            .on_update(ReferentialAction::SetNull);
    });

    let statements = sql(compile_create(&table, Dialect::MySQL).unwrap());
    assert!(statements[0].contains(
        "    CONSTRAINT orders_fk_user_id FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE"
    ));
    assert!(statements[0].contains(
        "    CONSTRAINT orders_shop FOREIGN KEY (shop_id) REFERENCES shops (id) ON UPDATE SET NULL"
    ));
}

#[test]
fn test_foreign_key_without_reference_fails() {
    let table = CreateTable::build("orders", |t| {
        t.integer("user_id");
        t.foreign(["user_id"]);
    });
    assert!(matches!(
        compile_create(&table, Dialect::Postgres),
        Err(QailError::InvalidArgument(_))
    ));
}

#[test]
fn test_unsupported_sizes() {
    let table = CreateTable::build("t", |t| {
        t.float("ratio").size(Size::Tiny);
    });
    for dialect in Dialect::ALL {
        assert!(matches!(
            compile_create(&table, dialect),
            Err(QailError::Unsupported { .. })
        ));
    }

    let table = CreateTable::build("t", |t| {
        t.string("code", 4).size(Size::Big);
    });
    assert!(matches!(
        compile_create(&table, Dialect::MySQL),
        Err(QailError::Unsupported { .. })
    ));
}

#[test]
fn test_type_mapping() {
    let table = CreateTable::build("t", |t| {
        t.decimal("price", 10, 2);
        t.double("weight");
        t.binary("blob_small").size(Size::Small);
        t.fixed("code", 3);
        t.date_time("seen_at");
        t.integer("qty").unsigned();
    });

    let mysql = sql(compile_create(&table, Dialect::MySQL).unwrap());
    assert!(mysql[0].contains("price DECIMAL(10,2)"));
    assert!(mysql[0].contains("weight DOUBLE"));
    assert!(mysql[0].contains("blob_small TINYBLOB"));
    assert!(mysql[0].contains("code CHAR(3)"));
    assert!(mysql[0].contains("seen_at DATETIME"));
    assert!(mysql[0].contains("qty INT UNSIGNED"));

    let pg = sql(compile_create(&table, Dialect::Postgres).unwrap());
    assert!(pg[0].contains("weight DOUBLE PRECISION"));
    assert!(pg[0].contains("blob_small BYTEA"));
    assert!(pg[0].contains("seen_at TIMESTAMP"));
    assert!(pg[0].contains("qty INTEGER\n)"));

    let mssql = sql(compile_create(&table, Dialect::SqlServer).unwrap());
    assert!(mssql[0].contains("blob_small VARBINARY(255)"));
    assert!(mssql[0].contains("code NCHAR(3)"));
}

#[test]
fn test_create_requires_columns() {
    let table = CreateTable::new("empty");
    assert!(matches!(
        compile_create(&table, Dialect::MySQL),
        Err(QailError::InvalidArgument(_))
    ));
}

// ============= ALTER TABLE =============

fn no_types() -> ColumnTypes {
    ColumnTypes::new()
}

#[test]
fn test_alter_mysql() {
    let alter = AlterTable::build("users", |t| {
        t.string("nickname", 40);
        t.modify("age", ColumnType::Integer).size(Size::Small).not_null();
        t.drop_column("legacy");
        t.set_default("active", false);
        t.drop_default("bio");
        t.drop_index("users_ik_created_at");
        t.drop_primary("users_pk_id");
    });
    let statements = sql(compile_alter(&alter, Dialect::MySQL, &no_types()).unwrap());
    assert_eq!(
        statements,
        vec![
            "ALTER TABLE users ADD COLUMN nickname VARCHAR(40)",
            "ALTER TABLE users MODIFY COLUMN age SMALLINT NOT NULL",
            "ALTER TABLE users DROP COLUMN legacy",
            "ALTER TABLE users ALTER active SET DEFAULT 0",
            "ALTER TABLE users ALTER bio DROP DEFAULT",
            "ALTER TABLE users DROP INDEX users_ik_created_at",
            "ALTER TABLE users DROP PRIMARY KEY",
        ]
    );
}

#[test]
fn test_mysql_rename_needs_column_type() {
    let alter = AlterTable::build("users", |t| {
        t.rename_column("name", "full_name");
    });

    let missing = compile_alter(&alter, Dialect::MySQL, &no_types());
    assert!(matches!(
        missing,
        Err(QailError::MissingColumnType { ref table, ref column })
            if table == "users" && column == "name"
    ));

    let mut types = ColumnTypes::new();
    types.insert("name".to_string(), "varchar(100)".to_string());
    let statements = sql(compile_alter(&alter, Dialect::MySQL, &types).unwrap());
    assert_eq!(
        statements,
        vec!["ALTER TABLE users CHANGE name full_name varchar(100)"]
    );
}

#[test]
fn test_rename_column_other_dialects() {
    let alter = AlterTable::build("users", |t| {
        t.rename_column("name", "full_name");
    });
    assert_eq!(
        sql(compile_alter(&alter, Dialect::Postgres, &no_types()).unwrap()),
        vec!["ALTER TABLE users RENAME COLUMN name TO full_name"]
    );
    assert_eq!(
        sql(compile_alter(&alter, Dialect::SQLite, &no_types()).unwrap()),
        vec!["ALTER TABLE users RENAME COLUMN name TO full_name"]
    );
    assert_eq!(
        sql(compile_alter(&alter, Dialect::SqlServer, &no_types()).unwrap()),
        vec!["EXEC sp_rename 'users.name', 'full_name', 'COLUMN'"]
    );
}

#[test]
fn test_alter_postgres_modify_is_one_statement() {
    let alter = AlterTable::build("users", |t| {
        t.modify("score", ColumnType::Integer)
            .size(Size::Big)
            .default_value(0);
    });
    assert_eq!(
        sql(compile_alter(&alter, Dialect::Postgres, &no_types()).unwrap()),
        vec![
            "ALTER TABLE users ALTER COLUMN score TYPE BIGINT, \
             ALTER COLUMN score DROP NOT NULL, ALTER COLUMN score SET DEFAULT 0"
        ]
    );
}

#[test]
fn test_alter_autoincrement() {
    let alter = AlterTable::build("users", |t| {
        t.autoincrement("id");
    });

    assert_eq!(
        sql(compile_alter(&alter, Dialect::MySQL, &no_types()).unwrap()),
        vec![
            "ALTER TABLE users MODIFY id INT AUTO_INCREMENT NOT NULL, \
             ADD CONSTRAINT users_pk_id PRIMARY KEY (id)"
        ]
    );
    assert_eq!(
        sql(compile_alter(&alter, Dialect::Postgres, &no_types()).unwrap()),
        vec![
            "ALTER TABLE users ALTER COLUMN id SET NOT NULL, \
             ALTER COLUMN id ADD GENERATED BY DEFAULT AS IDENTITY, \
             ADD CONSTRAINT users_pk_id PRIMARY KEY (id)"
        ]
    );
    for dialect in [Dialect::SQLite, Dialect::SqlServer] {
        assert!(matches!(
            compile_alter(&alter, dialect, &no_types()),
            Err(QailError::Unsupported { .. })
        ));
    }
}

#[test]
fn test_alter_add_autoincrement_column_declares_key_inline() {
    let alter = AlterTable::build("t", |t| {
        t.integer("id").autoincrement();
    });

    assert_eq!(
        sql(compile_alter(&alter, Dialect::MySQL, &no_types()).unwrap()),
        vec![
            "ALTER TABLE t ADD COLUMN id INT AUTO_INCREMENT NOT NULL, \
             ADD CONSTRAINT t_pk_id PRIMARY KEY (id)"
        ]
    );
    assert_eq!(
        sql(compile_alter(&alter, Dialect::Postgres, &no_types()).unwrap()),
        vec![
            "ALTER TABLE t ADD COLUMN id SERIAL NOT NULL, \
             ADD CONSTRAINT t_pk_id PRIMARY KEY (id)"
        ]
    );
    assert_eq!(
        sql(compile_alter(&alter, Dialect::SqlServer, &no_types()).unwrap()),
        vec![
            "ALTER TABLE t ADD id INTEGER IDENTITY NOT NULL, \
             CONSTRAINT t_pk_id PRIMARY KEY (id)"
        ]
    );
    assert!(matches!(
        compile_alter(&alter, Dialect::SQLite, &no_types()),
        Err(QailError::Unsupported { .. })
    ));
}

#[test]
fn test_sqlite_autoincrement_must_be_sole_primary_key() {
    let table = CreateTable::build("t", |t| {
        t.integer("id").autoincrement();
        t.integer("k");
        t.primary(["id", "k"]);
    });

    assert!(matches!(
        compile_create(&table, Dialect::SQLite),
        Err(QailError::Unsupported { .. })
    ));
    let mysql = sql(compile_create(&table, Dialect::MySQL).unwrap());
    assert!(mysql[0].contains("CONSTRAINT t_pk_id_k PRIMARY KEY (id, k)"));
}

#[test]
fn test_alter_sqlite_limits() {
    let supported = AlterTable::build("users", |t| {
        t.text("bio");
        t.unique(["email"]);
        t.index(["name"]);
        t.drop_index("users_ik_name");
    });
    assert_eq!(
        sql(compile_alter(&supported, Dialect::SQLite, &no_types()).unwrap()),
        vec![
            "ALTER TABLE users ADD COLUMN bio TEXT",
            "CREATE UNIQUE INDEX users_uk_email ON users (email)",
            "CREATE INDEX users_ik_name ON users (name)",
            "DROP INDEX users_ik_name",
        ]
    );

    let modify = AlterTable::build("users", |t| {
        t.modify("bio", ColumnType::Text);
    });
    assert!(matches!(
        compile_alter(&modify, Dialect::SQLite, &no_types()),
        Err(QailError::Unsupported { .. })
    ));

    let default = AlterTable::build("users", |t| {
        t.set_default("active", true);
    });
    assert!(matches!(
        compile_alter(&default, Dialect::SQLite, &no_types()),
        Err(QailError::Unsupported { .. })
    ));
}

#[test]
fn test_alter_sqlserver_defaults_are_constraints() {
    let alter = AlterTable::build("users", |t| {
        t.set_default("active", true);
        t.drop_default("active");
        t.modify("age", ColumnType::Integer).not_null().default_value(18);
        t.drop_index("users_ik_age");
    });
    assert_eq!(
        sql(compile_alter(&alter, Dialect::SqlServer, &no_types()).unwrap()),
        vec![
            "ALTER TABLE users ADD CONSTRAINT DF_users_active DEFAULT 1 FOR active",
            "ALTER TABLE users DROP CONSTRAINT DF_users_active",
            "ALTER TABLE users ALTER COLUMN age INTEGER NOT NULL",
            "ALTER TABLE users ADD CONSTRAINT DF_users_age DEFAULT 18 FOR age",
            "DROP INDEX users_ik_age ON users",
        ]
    );
}

#[test]
fn test_alter_foreign_key() {
    let alter = AlterTable::build("orders", |t| {
        t.foreign(["user_id"])
            .references("users", ["id"])
            .on_delete(ReferentialAction::Restrict);
        t.drop_foreign("orders_fk_old");
    });
    assert_eq!(
        sql(compile_alter(&alter, Dialect::MySQL, &no_types()).unwrap()),
        vec![
            "ALTER TABLE orders ADD CONSTRAINT orders_fk_user_id FOREIGN KEY (user_id) \
             REFERENCES users (id) ON DELETE RESTRICT",
            "ALTER TABLE orders DROP FOREIGN KEY orders_fk_old",
        ]
    );
    assert_eq!(
        sql(compile_alter(&alter, Dialect::Postgres, &no_types()).unwrap())[1],
        "ALTER TABLE orders DROP CONSTRAINT orders_fk_old"
    );
}

#[test]
fn test_alter_comment_fan_out() {
    let alter = AlterTable::build("users", |t| {
        t.string("nickname", 40).description("Shown publicly");
    });
    assert_eq!(
        sql(compile_alter(&alter, Dialect::Postgres, &no_types()).unwrap()),
        vec![
            "ALTER TABLE users ADD COLUMN nickname VARCHAR(40)",
            "COMMENT ON COLUMN users.nickname IS 'Shown publicly'",
        ]
    );
    assert_eq!(
        sql(compile_alter(&alter, Dialect::MySQL, &no_types()).unwrap()),
        vec!["ALTER TABLE users ADD COLUMN nickname VARCHAR(40) COMMENT 'Shown publicly'"]
    );
}
