use argon2::{Argon2, PasswordHasher};
use argon2::password_hash::{SaltString, rand_core::OsRng};

// Prints the statement that provisions a login user, e.g.
//   hashpass root 's3cret' | psql "$DATABASE_URL"
fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(usuario), Some(clave)) = (args.next(), args.next()) else {
        anyhow::bail!("Usage: hashpass <usuario> <clave>");
    };

    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(clave.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("argon2 hash error: {e}"))?
        .to_string();

    println!(
        "INSERT INTO usuarios (usuario, clave_hash) VALUES ('{}', '{}') \
         ON CONFLICT (usuario) DO UPDATE SET clave_hash = EXCLUDED.clave_hash;",
        usuario.replace('\'', "''"),
        phc
    );
    Ok(())
}
