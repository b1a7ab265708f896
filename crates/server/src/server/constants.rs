pub const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>Study Catalog API</title>
  </head>
  <body>
    <h1>Study Catalog API</h1>
    <p>Endpoints: /users, /tags, /resources, /to-study-list/:userId, /comments/:resourceId, /tags/:resourceId</p>
  </body>
</html>
"#;
