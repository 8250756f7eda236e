//! SQL schema for the amparo SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS` and
/// `INSERT OR IGNORE` catalog seeds.
///
/// `PRAGMA foreign_keys = ON` is a correctness precondition: cascade deletes
/// and referential checks across the case cluster depend on it.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Base identity. Specialisations share this primary key.
CREATE TABLE IF NOT EXISTS persona (
    persona_id       INTEGER PRIMARY KEY,
    cedula           TEXT UNIQUE,
    primer_nombre    TEXT NOT NULL,
    segundo_nombre   TEXT,
    primer_apellido  TEXT NOT NULL,
    segundo_apellido TEXT,
    genero           TEXT NOT NULL CHECK (genero IN ('M', 'F')),
    direccion        TEXT,
    telefono         TEXT UNIQUE,
    activo           INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS nna (
    persona_id       INTEGER PRIMARY KEY REFERENCES persona(persona_id),
    fecha_nacimiento TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS familiar (
    persona_id INTEGER PRIMARY KEY REFERENCES persona(persona_id),
    tutor      INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS tercero (
    persona_id INTEGER PRIMARY KEY REFERENCES persona(persona_id),
    vinculo    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cargo (
    cargo_id INTEGER PRIMARY KEY,
    nombre   TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS personal (
    persona_id INTEGER PRIMARY KEY REFERENCES persona(persona_id),
    cargo_id   INTEGER NOT NULL REFERENCES cargo(cargo_id),
    credencial TEXT
);

CREATE TABLE IF NOT EXISTS parentesco (
    parentesco_id INTEGER PRIMARY KEY,
    nombre        TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS relacion_nna (
    nna_id        INTEGER NOT NULL REFERENCES nna(persona_id),
    familiar_id   INTEGER NOT NULL REFERENCES familiar(persona_id),
    parentesco_id INTEGER NOT NULL REFERENCES parentesco(parentesco_id),
    convive       INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (nna_id, familiar_id, parentesco_id)
);

CREATE TABLE IF NOT EXISTS matricula_educativa (
    matricula_id INTEGER PRIMARY KEY,
    nna_id       INTEGER NOT NULL REFERENCES nna(persona_id),
    institucion  TEXT NOT NULL,
    grado        TEXT NOT NULL,
    anio_lectivo TEXT NOT NULL,
    activa       INTEGER NOT NULL DEFAULT 1
);

-- Case cluster. Children cascade on case deletion.
CREATE TABLE IF NOT EXISTS denuncia (
    denuncia_id    INTEGER PRIMARY KEY,
    consejero_id   INTEGER NOT NULL REFERENCES personal(persona_id),
    fecha_registro TEXT NOT NULL,   -- ISO 8601 date
    fecha_hecho    TEXT NOT NULL,   -- ISO 8601 date
    descripcion    TEXT NOT NULL,
    abierta        INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS nna_involucrado (
    denuncia_id INTEGER NOT NULL REFERENCES denuncia(denuncia_id) ON DELETE CASCADE,
    nna_id      INTEGER NOT NULL REFERENCES nna(persona_id),
    rol         TEXT NOT NULL CHECK (rol IN ('victima', 'agresor', 'testigo')),
    detalle     TEXT NOT NULL,
    PRIMARY KEY (denuncia_id, nna_id)
);

CREATE TABLE IF NOT EXISTS denunciante (
    denunciante_id INTEGER PRIMARY KEY,
    denuncia_id    INTEGER NOT NULL REFERENCES denuncia(denuncia_id) ON DELETE CASCADE,
    persona_id     INTEGER REFERENCES persona(persona_id),   -- NULL = anonymous
    declaracion    TEXT NOT NULL,
    lesiones       TEXT
);

CREATE TABLE IF NOT EXISTS denunciado (
    denuncia_id INTEGER NOT NULL REFERENCES denuncia(denuncia_id) ON DELETE CASCADE,
    persona_id  INTEGER NOT NULL REFERENCES persona(persona_id),
    medidas     TEXT,
    PRIMARY KEY (denuncia_id, persona_id)
);

CREATE TABLE IF NOT EXISTS seguimiento (
    seguimiento_id INTEGER PRIMARY KEY,
    denuncia_id    INTEGER NOT NULL REFERENCES denuncia(denuncia_id) ON DELETE CASCADE,
    consejero_id   INTEGER NOT NULL REFERENCES personal(persona_id),
    fecha          TEXT NOT NULL,   -- ISO 8601 date
    registrado_en  TEXT NOT NULL,   -- RFC 3339 UTC; store-assigned
    observacion    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cierre (
    cierre_id    INTEGER PRIMARY KEY,
    denuncia_id  INTEGER NOT NULL UNIQUE REFERENCES denuncia(denuncia_id) ON DELETE CASCADE,
    consejero_id INTEGER NOT NULL REFERENCES personal(persona_id),
    fecha_cierre TEXT NOT NULL,
    acta         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS denuncia_registro_idx ON denuncia(fecha_registro);
CREATE INDEX IF NOT EXISTS seguimiento_caso_idx  ON seguimiento(denuncia_id, fecha);
CREATE INDEX IF NOT EXISTS relacion_nna_idx      ON relacion_nna(nna_id);
CREATE INDEX IF NOT EXISTS matricula_nna_idx     ON matricula_educativa(nna_id);

-- Standard catalog entries; present from first start.
INSERT OR IGNORE INTO parentesco (nombre) VALUES
    ('Madre'), ('Padre'), ('Abuelo/a'), ('Hermano/a'), ('Tio/a'), ('Otro');
INSERT OR IGNORE INTO cargo (nombre) VALUES
    ('Consejero'), ('Psicologo'), ('Trabajador Social'), ('Director');

PRAGMA user_version = 1;
";
